use std::collections::HashMap;

use crate::{ast::ast::{ExprWrapper, StmtWrapper}, errors::errors::Error, lexer::tokens::TokenKind};

use super::{expr::*, parser::Parser, stmt::*};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    LogicalOr,
    LogicalAnd,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Member,
    Primary
}

pub type StmtHandler = fn(&mut Parser) -> Result<StmtWrapper, Error>;
pub type NUDHandler = fn(&mut Parser) -> Result<ExprWrapper, Error>;
pub type LEDHandler = fn(&mut Parser, ExprWrapper, BindingPower) -> Result<ExprWrapper, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Logical
    parser.led(TokenKind::Or, BindingPower::LogicalOr, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::LogicalAnd, parse_binary_expr);

    // Relational
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Pipe, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Caret, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::ShiftLeft, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::ShiftRight, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Ampersand, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::AndNot, BindingPower::Multiplicative, parse_binary_expr);

    // Postfix
    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Call, parse_index_expr);
    parser.led(TokenKind::Dot, BindingPower::Member, parse_selector_expr);

    // Literals and symbols
    parser.nud(TokenKind::Int, parse_primary_expr);
    parser.nud(TokenKind::Float, parse_primary_expr);
    parser.nud(TokenKind::Char, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::Func, parse_func_lit_expr);

    // Type expressions, possibly followed by a composite literal body
    parser.nud(TokenKind::OpenBracket, parse_type_or_composite_expr);
    parser.nud(TokenKind::Map, parse_type_or_composite_expr);
    parser.nud(TokenKind::Chan, parse_type_or_composite_expr);

    // Unary
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Plus, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::Caret, parse_prefix_expr);
    parser.nud(TokenKind::Star, parse_prefix_expr);
    parser.nud(TokenKind::Ampersand, parse_prefix_expr);
    parser.nud(TokenKind::Arrow, parse_prefix_expr);

    // Statements
    parser.stmt(TokenKind::OpenCurly, parse_block_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
