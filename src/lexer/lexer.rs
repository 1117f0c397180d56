use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

impl RegexPattern {
    fn new(pattern: &str, handler: RegexHandler) -> Self {
        RegexPattern {
            regex: Regex::new(pattern).expect("lexer pattern must compile"),
            handler,
        }
    }
}

lazy_static! {
    // Every pattern is anchored; order decides between overlapping prefixes
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern::new("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        RegexPattern::new(
            "^([0-9]+\\.[0-9]*([eE][+-]?[0-9]+)?|\\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+)",
            float_handler,
        ),
        RegexPattern::new("^[0-9]+", int_handler),
        RegexPattern::new("^\\n", newline_handler),
        RegexPattern::new("^[ \\t\\r]+", skip_handler),
        RegexPattern::new("^//[^\\n]*", skip_handler),
        RegexPattern::new("^\"(\\\\.|[^\"\\\\\\n])*\"", string_handler),
        RegexPattern::new("^`[^`]*`", string_handler),
        RegexPattern::new("^'(\\\\.|[^'\\\\\\n])+'", char_handler),
        RegexPattern::new("^:=", MK_DEFAULT_HANDLER!(TokenKind::Define, ":=")),
        RegexPattern::new("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        RegexPattern::new("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        RegexPattern::new("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        RegexPattern::new("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        RegexPattern::new("^<<", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<")),
        RegexPattern::new("^>>", MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>")),
        RegexPattern::new("^<-", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "<-")),
        RegexPattern::new("^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        RegexPattern::new("^\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        RegexPattern::new("^&\\^", MK_DEFAULT_HANDLER!(TokenKind::AndNot, "&^")),
        RegexPattern::new("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        RegexPattern::new("^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        RegexPattern::new("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        RegexPattern::new("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        RegexPattern::new("^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        RegexPattern::new("^\\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        RegexPattern::new("^\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
        RegexPattern::new("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        RegexPattern::new("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        RegexPattern::new("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        RegexPattern::new("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        RegexPattern::new("^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        RegexPattern::new("^\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        RegexPattern::new("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        RegexPattern::new("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        RegexPattern::new("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        RegexPattern::new("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        RegexPattern::new("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        RegexPattern::new("^\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        RegexPattern::new("^\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        RegexPattern::new("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        RegexPattern::new("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span covering the next `len` bytes.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    fn last_kind(&self) -> Option<TokenKind> {
        self.tokens.last().map(|token| token.kind)
    }

    fn push_matched(&mut self, kind: TokenKind, regex: &Regex) {
        let matched = match regex.find(self.remainder()) {
            Some(found) => found.as_str().to_string(),
            None => return,
        };

        let span = self.span_of(matched.len());
        let len = matched.len();
        self.push(MK_TOKEN!(kind, matched, span));
        self.advance_n(len);
    }
}

fn int_handler(lexer: &mut Lexer, regex: &Regex) {
    lexer.push_matched(TokenKind::Int, regex);
}

fn float_handler(lexer: &mut Lexer, regex: &Regex) {
    lexer.push_matched(TokenKind::Float, regex);
}

// Literal tokens keep their quotes; decoding happens at evaluation time
fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    lexer.push_matched(TokenKind::String, regex);
}

fn char_handler(lexer: &mut Lexer, regex: &Regex) {
    lexer.push_matched(TokenKind::Char, regex);
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    if let Some(found) = regex.find(lexer.remainder()) {
        lexer.advance_n(found.end());
    }
}

fn newline_handler(lexer: &mut Lexer, _regex: &Regex) {
    if lexer.last_kind().is_some_and(|kind| kind.ends_statement()) {
        let span = lexer.span_of(1);
        lexer.push(MK_TOKEN!(TokenKind::Semicolon, String::from("\n"), span));
    }
    lexer.advance_n(1);
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = match regex.find(lexer.remainder()) {
        Some(found) => found.as_str().to_string(),
        None => return,
    };

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let span = lexer.span_of(value.len());
    let len = value.len();
    lexer.push(MK_TOKEN!(kind, value, span));
    lexer.advance_n(len);
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                let token = lex.remainder().chars().next().map(String::from).unwrap_or_default();
                return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, lex.position()));
            }
        }
    }

    let span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));
    Ok(lex.tokens)
}
