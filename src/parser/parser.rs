//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix and postfix expressions
//! - Binding powers for operator precedence
//! - Type expression handlers

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::statements::BlockStmt,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::{expect_stmt_end, parse_stmt},
    types::{create_token_type_lookups, TypeNUDHandler, TypeNUDLookup},
};

/// Deepest syntax nesting a fragment may have.
pub const MAX_NESTING: usize = 1000;

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements, expressions, and types. It tracks the current
/// position in the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type expression handlers
    type_nud_lookup: TypeNUDLookup,
    /// Current syntax nesting, capped at `MAX_NESTING`
    nesting: usize,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// An EOF token is appended when the stream does not already end in one.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span { start: end.clone(), end }
            ));
        }

        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            nesting: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The position never moves past the trailing EOF token.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an `UnexpectedToken` error for the current token.
    pub fn unexpected(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current_token().value.clone(),
            },
            self.get_position(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Registers a left denotation (infix/postfix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Tokens that already have an infix binding power keep it.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.binding_power_lookup
            .entry(kind)
            .or_insert(BindingPower::Primary);
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.binding_power_lookup
            .entry(kind)
            .or_insert(BindingPower::Default);
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type expression handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Goes one level deeper into the syntax tree.
    pub fn enter(&mut self) -> Result<(), Error> {
        if self.nesting >= MAX_NESTING {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: self.current_token().value.clone(),
                    message: format!("nesting deeper than {} levels", MAX_NESTING),
                },
                self.get_position(),
            ));
        }
        self.nesting += 1;
        Ok(())
    }

    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Resets the nesting level saved before a recursive parse.
    pub fn restore_nesting(&mut self, nesting: usize) {
        self.nesting = nesting;
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Returns the end position of the most recently consumed token.
    pub fn last_end(&self) -> Position {
        match self.pos.checked_sub(1) {
            Some(previous) => self.tokens[previous].span.end.clone(),
            None => Position(0, Rc::clone(&self.file)),
        }
    }

    /// Span from `start` up to the most recently consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span {
            start,
            end: self.last_end(),
        }
    }
}

/// Parses a stream of tokens into an Abstract Syntax Tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses statements until EOF. The
/// statements of a fragment are returned as one root block.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (with state after parsing)
/// - Result containing either the root BlockStmt or an Error
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, Result<BlockStmt, Error>) {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut body = vec![];

    while parser.has_tokens() {
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            continue;
        }

        let stmt = parse_stmt(&mut parser).and_then(|stmt| {
            expect_stmt_end(&mut parser, TokenKind::EOF)?;
            Ok(stmt)
        });

        match stmt {
            Ok(stmt) => body.push(stmt),
            Err(error) => return (parser, Err(error)),
        }
    }

    let block = Ok(BlockStmt {
        body,
        span: Span {
            start: Position(0, Rc::clone(&file)),
            end: parser.get_position(),
        },
    });

    (parser, block)
}
