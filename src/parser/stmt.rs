use crate::{
    ast::{
        ast::{Expr, StmtWrapper},
        statements::{AssignStmt, BlockStmt, ExpressionStmt, ReturnStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    stack::ensure_sufficient_stack,
};

use super::parser::Parser;

/// Parses one statement without consuming its terminator.
pub fn parse_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let kind = parser.current_token_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    if parser.current_token_kind() == TokenKind::Identifier
        && matches!(parser.peek_kind(), TokenKind::Define | TokenKind::Assignment)
    {
        return parse_assign_stmt(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    if matches!(
        parser.current_token_kind(),
        TokenKind::Define | TokenKind::Assignment
    ) {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("only a bare identifier can be assigned"),
            },
            parser.get_position(),
        ));
    }

    Ok(StmtWrapper::new(ExpressionStmt {
        span: expr.get_span().clone(),
        expression: expr,
    }))
}

/// Accepts a `;` (explicit or inserted at a line break) or, without
/// consuming it, the token that closes the enclosing block.
pub fn expect_stmt_end(parser: &mut Parser, closing: TokenKind) -> Result<(), Error> {
    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            Ok(())
        }
        kind if kind == closing => Ok(()),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected end of statement"),
            },
            parser.get_position(),
        )),
    }
}

pub fn parse_assign_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let target = parser.expect(TokenKind::Identifier)?;
    let define = parser.advance().kind == TokenKind::Define;

    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(StmtWrapper::new(AssignStmt {
        identifier: target.value,
        define,
        value,
        span: parser.span_from(target.span.start),
    }))
}

/// Parses `{ stmt; stmt; ... }` into a block node.
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let nesting = parser.nesting();
    let block = ensure_sufficient_stack(|| {
        parser.enter()?;
        parse_block_body(parser)
    });
    parser.restore_nesting(nesting);
    block
}

fn parse_block_body(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut statements = Vec::new();
    loop {
        match parser.current_token_kind() {
            TokenKind::CloseCurly => break,
            TokenKind::Semicolon => {
                parser.advance();
            }
            TokenKind::EOF => return Err(parser.unexpected()),
            _ => {
                statements.push(parse_stmt(parser)?);
                expect_stmt_end(parser, TokenKind::CloseCurly)?;
            }
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body: statements,
        span: parser.span_from(start),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    Ok(StmtWrapper::new(parse_block(parser)?))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.advance().span.start.clone();

    let mut results = vec![];
    if !matches!(
        parser.current_token_kind(),
        TokenKind::Semicolon | TokenKind::CloseCurly | TokenKind::EOF
    ) {
        results.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            results.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    Ok(StmtWrapper::new(ReturnStmt {
        results,
        span: parser.span_from(start),
    }))
}
