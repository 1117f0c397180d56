//! Tree-walking evaluator for shell fragments.
//!
//! Fragments are tokenized and parsed by the in-crate front end, then walked
//! against a chain of scopes that mirror the host program's live variables:
//!
//! - `scope`: nested bindings and the builtin root scope
//! - `value`/`types`: runtime values, type descriptors and conversions
//! - `operators`/`builtins`: operator semantics, `append` and `make`
//! - `expr`/`stmt`: the evaluators for each syntax-node kind

use std::rc::Rc;

use tracing::instrument;

use crate::{errors::errors::Error, lexer::lexer::tokenize, parser::parser::parse};

pub mod builtins;
pub mod expr;
pub mod operators;
pub mod scope;
pub mod stmt;
pub mod types;
pub mod value;

#[cfg(test)]
mod tests;

pub use expr::interpret_expr;
pub use scope::Scope;
pub use stmt::interpret_stmt;
pub use types::{string_to_type, Type};
pub use value::{Function, NativeFunction, Package, StructValue, Value};

/// Parses and evaluates `text` in `scope`.
///
/// An empty fragment evaluates to `Nil`; several statements evaluate in
/// order and yield the last one's value.
#[instrument(level = "debug", skip(scope))]
pub fn interpret_string(scope: &Scope, text: &str) -> Result<Value, Error> {
    let file = Rc::new(String::from("shell"));
    let tokens = tokenize(text.to_string(), Some(file.to_string()))?;
    let (_, block) = parse(tokens, Rc::clone(&file));
    let block = block?;

    match block.body.as_slice() {
        [] => Ok(Value::Nil),
        [stmt] => interpret_stmt(scope, stmt),
        _ => stmt::interpret_block(scope, &block),
    }
}
