use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("func", TokenKind::Func);
        map.insert("return", TokenKind::Return);
        map.insert("map", TokenKind::Map);
        map.insert("chan", TokenKind::Chan);

        // Reserved by the host grammar but never evaluated
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("range", TokenKind::Range);
        map.insert("switch", TokenKind::Switch);
        map.insert("case", TokenKind::Case);
        map.insert("default", TokenKind::Default);
        map.insert("break", TokenKind::Break);
        map.insert("continue", TokenKind::Continue);
        map.insert("goto", TokenKind::Goto);
        map.insert("fallthrough", TokenKind::Fallthrough);
        map.insert("select", TokenKind::Select);
        map.insert("go", TokenKind::Go);
        map.insert("defer", TokenKind::Defer);
        map.insert("var", TokenKind::Var);
        map.insert("const", TokenKind::Const);
        map.insert("type", TokenKind::Type);
        map.insert("struct", TokenKind::Struct);
        map.insert("interface", TokenKind::Interface);
        map.insert("package", TokenKind::Package);
        map.insert("import", TokenKind::Import);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Int,
    Float,
    Char,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Define,     // :=
    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    Semicolon,
    Colon,
    Comma,
    Arrow, // <-

    Plus,
    Dash,
    Slash,
    Star,
    Percent,
    Ampersand,
    Pipe,
    Caret,
    AndNot,     // &^
    ShiftLeft,  // <<
    ShiftRight, // >>

    // Reserved
    Func,
    Return,
    Map,
    Chan,
    If,
    Else,
    For,
    Range,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Goto,
    Fallthrough,
    Select,
    Go,
    Defer,
    Var,
    Const,
    Type,
    Struct,
    Interface,
    Package,
    Import,
}

impl TokenKind {
    /// Whether a newline directly after this token ends the statement.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::Return
                | TokenKind::CloseParen
                | TokenKind::CloseBracket
                | TokenKind::CloseCurly
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}
