#![allow(clippy::module_inception)]

use std::rc::Rc;

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod stack;

extern crate regex;

pub use interpreter::{
    interpret_expr, interpret_stmt, interpret_string, string_to_type, Function, NativeFunction,
    Package, Scope, StructValue, Type, Value,
};

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Finds the line of `source` containing the byte offset `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line, or `None` when the offset is past the end.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // Offset sits exactly at the end of the input (e.g. an EOF error)
    if source.is_empty() || source.ends_with('\n') {
        return Some((line_number, String::new(), 0));
    }

    let last = source.rsplit('\n').next().unwrap_or("");
    Some((line_number - 1, last.to_string(), last.len()))
}
