//! Lexical analysis module.
//!
//! Converts a shell fragment into a stream of tokens for parsing. It handles:
//!
//! - Tokenization using an ordered table of anchored regex patterns
//! - Recognition of reserved words, identifiers, literals and operators
//! - Automatic statement termination at line ends
//! - Token position tracking for error reporting

pub mod lexer;
pub mod tokens;
