//! Type parsing implementation.
//!
//! Type expressions share the expression node set: a type is a name, a
//! qualified `pkg.Name`, `[]T`, `map[K]V`, a channel type or a
//! parenthesised type. The evaluator resolves them against its registry.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::ExprWrapper,
        expressions::{
            ArrayTypeExpr, ChanDir, ChanTypeExpr, IdentExpr, MapTypeExpr, ParenExpr, SelectorExpr,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    stack::ensure_sufficient_stack,
};

use super::parser::Parser;

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<ExprWrapper, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
    parser.type_nud(TokenKind::Map, parse_map_type);
    parser.type_nud(TokenKind::Chan, parse_chan_type);
    parser.type_nud(TokenKind::Arrow, parse_chan_type);
    parser.type_nud(TokenKind::OpenParen, parse_paren_type);
}

pub fn parse_type(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let nesting = parser.nesting();
    let ty = ensure_sufficient_stack(|| {
        parser.enter()?;
        let token_kind = parser.current_token_kind();
        match parser.get_type_nud_lookup().get(&token_kind).copied() {
            Some(handler) => handler(parser),
            None => Err(parser.unexpected()),
        }
    });
    parser.restore_nesting(nesting);
    ty
}

/// `name` or `pkg.Name`
pub fn parse_symbol_type(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    let ident = ExprWrapper::new(IdentExpr {
        name: token.value,
        span: token.span.clone(),
    });

    if parser.current_token_kind() != TokenKind::Dot || parser.peek_kind() != TokenKind::Identifier {
        return Ok(ident);
    }

    parser.advance();
    let selector = parser.expect(TokenKind::Identifier)?.value;

    Ok(ExprWrapper::new(SelectorExpr {
        target: ident,
        selector,
        span: parser.span_from(token.span.start),
    }))
}

/// `[]element`; fixed-length arrays are not part of the language.
pub fn parse_array_type(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.expect(TokenKind::OpenBracket)?.span.start;
    parser.expect(TokenKind::CloseBracket)?;

    let element = parse_type(parser)?;

    Ok(ExprWrapper::new(ArrayTypeExpr {
        element,
        span: parser.span_from(start),
    }))
}

pub fn parse_map_type(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.expect(TokenKind::Map)?.span.start;
    parser.expect(TokenKind::OpenBracket)?;
    let key = parse_type(parser)?;
    parser.expect(TokenKind::CloseBracket)?;
    let value = parse_type(parser)?;

    Ok(ExprWrapper::new(MapTypeExpr {
        key,
        value,
        span: parser.span_from(start),
    }))
}

/// `chan T`, `chan<- T` or `<-chan T`
pub fn parse_chan_type(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.get_position();

    let dir = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        parser.expect(TokenKind::Chan)?;
        ChanDir::Recv
    } else {
        parser.expect(TokenKind::Chan)?;
        if parser.current_token_kind() == TokenKind::Arrow {
            parser.advance();
            ChanDir::Send
        } else {
            ChanDir::Both
        }
    };

    let value = parse_type(parser)?;

    Ok(ExprWrapper::new(ChanTypeExpr {
        dir,
        value,
        span: parser.span_from(start),
    }))
}

pub fn parse_paren_type(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    let inner = parse_type(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(ExprWrapper::new(ParenExpr {
        inner,
        span: parser.span_from(start),
    }))
}
