//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with Go operator precedence and handles:
//!
//! - Statement parsing (assignments, blocks, returns, expressions)
//! - Expression parsing (binary ops, calls, selectors, literals)
//! - Type parsing for conversions, composite literals and signatures
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
