//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed operators

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's source text
/// * `$span` - The source span
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for a fixed-text operator or punctuation.
///
/// The handler pushes a token of the given kind spanning the literal text and
/// advances the lexer past it.
///
/// # Example
///
/// ```ignore
/// RegexPattern::new("^:=", MK_DEFAULT_HANDLER!(TokenKind::Define, ":="))
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let span = lexer.span_of($value.len());
            lexer.push(MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
        }
    };
}
