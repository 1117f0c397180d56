use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper},
        expressions::{
            BasicLitExpr, BinaryExpr, CallExpr, CompositeLitExpr, FuncLitExpr, IdentExpr,
            IndexExpr, KeyValueExpr, LitKind, ParenExpr, PrefixExpr, SelectorExpr, SliceExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    stack::ensure_sufficient_stack,
};

use super::{
    lookups::BindingPower,
    parser::Parser,
    stmt::parse_block,
    types::{parse_chan_type, parse_type},
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprWrapper, Error> {
    let nesting = parser.nesting();
    let expr = ensure_sufficient_stack(|| parse_expr_nested(parser, bp));
    parser.restore_nesting(nesting);
    expr
}

// Every prefix and every applied infix/postfix operator deepens the tree
fn parse_expr_nested(parser: &mut Parser, bp: BindingPower) -> Result<ExprWrapper, Error> {
    parser.enter()?;

    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        // Tokens without an infix handler end the expression; the caller
        // decides whether what follows is legal
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };

        parser.enter()?;
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let kind = match parser.current_token_kind() {
        TokenKind::Identifier => {
            let token = parser.advance();
            return Ok(ExprWrapper::new(IdentExpr {
                name: token.value.clone(),
                span: token.span.clone(),
            }));
        }
        TokenKind::Int => LitKind::Int,
        TokenKind::Float => LitKind::Float,
        TokenKind::Char => LitKind::Char,
        TokenKind::String => LitKind::String,
        _ => return Err(parser.unexpected()),
    };

    let token = parser.advance();
    Ok(ExprWrapper::new(BasicLitExpr {
        kind,
        value: token.value.clone(),
        span: token.span.clone(),
    }))
}

pub fn parse_binary_expr(parser: &mut Parser, left: ExprWrapper, bp: BindingPower) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;

    Ok(ExprWrapper::new(BinaryExpr {
        span: parser.span_from(left.get_span().start.clone()),
        left,
        operator: operator_token,
        right,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    // `<-chan T` is a type, not a receive
    if parser.current_token_kind() == TokenKind::Arrow && parser.peek_kind() == TokenKind::Chan {
        return parse_chan_type(parser);
    }

    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(ExprWrapper::new(PrefixExpr {
        span: parser.span_from(operator_token.span.start.clone()),
        operator: operator_token,
        right_expr: rhs,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.advance().span.start.clone();
    let inner = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(ExprWrapper::new(ParenExpr {
        inner,
        span: parser.span_from(start),
    }))
}

pub fn parse_call_expr(parser: &mut Parser, left: ExprWrapper, _bp: BindingPower) -> Result<ExprWrapper, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected());
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(ExprWrapper::new(CallExpr {
        span: parser.span_from(left.get_span().start.clone()),
        callee: left,
        arguments: args,
    }))
}

pub fn parse_selector_expr(parser: &mut Parser, left: ExprWrapper, _bp: BindingPower) -> Result<ExprWrapper, Error> {
    parser.expect(TokenKind::Dot)?;
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected field or method name after `.`"),
        },
        parser.get_position(),
    );
    let selector = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    Ok(ExprWrapper::new(SelectorExpr {
        span: parser.span_from(left.get_span().start.clone()),
        target: left,
        selector,
    }))
}

/// Parses `x[i]`, `x[lo:hi]`, `x[:hi]`, `x[lo:]` and `x[:]`.
pub fn parse_index_expr(parser: &mut Parser, left: ExprWrapper, _bp: BindingPower) -> Result<ExprWrapper, Error> {
    parser.expect(TokenKind::OpenBracket)?;

    let low = if parser.current_token_kind() == TokenKind::Colon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    if parser.current_token_kind() != TokenKind::Colon {
        parser.expect(TokenKind::CloseBracket)?;
        let index = match low {
            Some(index) => index,
            None => return Err(parser.unexpected()),
        };

        return Ok(ExprWrapper::new(IndexExpr {
            span: parser.span_from(left.get_span().start.clone()),
            target: left,
            index,
        }));
    }

    parser.expect(TokenKind::Colon)?;

    let high = if parser.current_token_kind() == TokenKind::CloseBracket {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    parser.expect(TokenKind::CloseBracket)?;

    Ok(ExprWrapper::new(SliceExpr {
        span: parser.span_from(left.get_span().start.clone()),
        target: left,
        low,
        high,
    }))
}

/// Parses a type expression and, for slice and map types, an optional
/// composite literal body straight after it.
pub fn parse_type_or_composite_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let literal_type = parse_type(parser)?;

    let composite = matches!(
        literal_type.get_expr_type(),
        ExprType::ArrayType | ExprType::MapType
    );

    if composite && parser.current_token_kind() == TokenKind::OpenCurly {
        return parse_composite_body(parser, literal_type);
    }

    Ok(literal_type)
}

fn parse_composite_body(parser: &mut Parser, literal_type: ExprWrapper) -> Result<ExprWrapper, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut elements = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        let element = parse_expr(parser, BindingPower::Default)?;

        let element = if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            let value = parse_expr(parser, BindingPower::Default)?;
            ExprWrapper::new(KeyValueExpr {
                span: parser.span_from(element.get_span().start.clone()),
                key: element,
                value,
            })
        } else {
            element
        };

        elements.push(element);

        // An element on its own line before `}` gets an inserted `;`
        match parser.current_token_kind() {
            TokenKind::Comma => {
                parser.advance();
            }
            TokenKind::CloseCurly => {}
            TokenKind::Semicolon if parser.current_token().value == "\n" => {
                parser.advance();
            }
            _ => return Err(parser.unexpected()),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(ExprWrapper::new(CompositeLitExpr {
        span: parser.span_from(literal_type.get_span().start.clone()),
        literal_type,
        elements,
    }))
}

/// Parses `func(params) results { body }`.
pub fn parse_func_lit_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let start = parser.expect(TokenKind::Func)?.span.start.clone();

    let parameters = parse_parameters(parser)?;

    let mut results = vec![];
    match parser.current_token_kind() {
        TokenKind::OpenCurly => {}
        TokenKind::OpenParen => {
            parser.advance();
            while parser.current_token_kind() != TokenKind::CloseParen {
                results.push(parse_type(parser)?);
                if parser.current_token_kind() == TokenKind::Comma {
                    parser.advance();
                } else if parser.current_token_kind() != TokenKind::CloseParen {
                    return Err(parser.unexpected());
                }
            }
            parser.expect(TokenKind::CloseParen)?;
        }
        _ => results.push(parse_type(parser)?),
    }

    let body = parse_block(parser)?;

    Ok(ExprWrapper::new(FuncLitExpr {
        parameters,
        results,
        body,
        span: parser.span_from(start),
    }))
}

/// Parses a parameter list, resolving `a, b int` groups.
///
/// When no entry carries a separate type, every entry is a type and the
/// parameters are anonymous (`_`).
fn parse_parameters(parser: &mut Parser) -> Result<Vec<(String, ExprWrapper)>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut entries: Vec<(ExprWrapper, Option<ExprWrapper>)> = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        let first = parse_type(parser)?;
        let declared = match parser.current_token_kind() {
            TokenKind::Comma | TokenKind::CloseParen => None,
            _ => Some(parse_type(parser)?),
        };
        entries.push((first, declared));

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected());
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    if entries.iter().all(|(_, declared)| declared.is_none()) {
        return Ok(entries
            .into_iter()
            .map(|(param_type, _)| (String::from("_"), param_type))
            .collect());
    }

    let mut parameters = Vec::with_capacity(entries.len());
    let mut pending: Vec<String> = vec![];

    for (first, declared) in entries {
        let name = match first.downcast::<IdentExpr>() {
            Some(ident) => ident.name.clone(),
            None => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: format!("{:?}", first.get_expr_type()),
                        message: String::from("expected parameter name"),
                    },
                    first.get_span().start.clone(),
                ))
            }
        };

        match declared {
            Some(param_type) => {
                for grouped in pending.drain(..) {
                    parameters.push((grouped, param_type.clone()));
                }
                parameters.push((name, param_type));
            }
            None => pending.push(name),
        }
    }

    if let Some(name) = pending.pop() {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: name,
                message: String::from("missing parameter type"),
            },
            close.span.start,
        ));
    }

    Ok(parameters)
}
