use std::fmt::Display;

use thiserror::Error;

use crate::{Position, Span};

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Attaches an evaluation failure to the start of a node's span.
    pub fn at(error_impl: ErrorImpl, span: &Span) -> Self {
        Error::new(error_impl, span.start.clone())
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Malformed input rejected before evaluation started.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::UnrecognisedToken { .. }
                | ErrorImpl::UnexpectedToken { .. }
                | ErrorImpl::UnexpectedTokenDetailed { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::UnresolvedIdentifier { .. } => "UnresolvedIdentifier",
            ErrorImpl::UndefinedVariable { .. } => "UndefinedVariable",
            ErrorImpl::AlreadyDefined { .. } => "AlreadyDefined",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::UnsupportedNode { .. } => "UnsupportedNode",
            ErrorImpl::UnsupportedOperator { .. } => "UnsupportedOperator",
            ErrorImpl::IndexOutOfRange { .. } => "IndexOutOfRange",
            ErrorImpl::InvalidIndexType { .. } => "InvalidIndexType",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::UnknownField { .. } => "UnknownField",
            ErrorImpl::InvalidLiteral { .. } => "InvalidLiteral",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::ArgumentCount { .. } => "ArgumentCount",
            ErrorImpl::UnsupportedArity { .. } => "UnsupportedArity",
            ErrorImpl::InvalidArgument { .. } => "InvalidArgument",
            ErrorImpl::HostError { .. } => "HostError",
            ErrorImpl::CallDepthExceeded { .. } => "CallDepthExceeded",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::UnresolvedIdentifier { identifier } => {
                ErrorTip::Suggestion(format!("Nothing named `{}` is in scope", identifier))
            }
            ErrorImpl::UndefinedVariable { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` is not defined, declare it with `:=` first",
                variable
            )),
            ErrorImpl::AlreadyDefined { variable } => ErrorTip::Suggestion(format!(
                "Variable `{}` is already defined, assign it with `=` instead",
                variable
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::UnsupportedNode { node } => {
                ErrorTip::Suggestion(format!("`{}` cannot be evaluated in the shell", node))
            }
            ErrorImpl::UnsupportedOperator { operator, operand } => ErrorTip::Suggestion(
                format!("Operator `{}` is not defined on `{}`", operator, operand),
            ),
            ErrorImpl::IndexOutOfRange { .. } => ErrorTip::None,
            ErrorImpl::InvalidIndexType { .. } => {
                ErrorTip::Suggestion(String::from("Indexes must be integers"))
            }
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::UnknownField { field } => {
                ErrorTip::Suggestion(format!("No field or method named `{}`", field))
            }
            ErrorImpl::InvalidLiteral { .. } => ErrorTip::None,
            ErrorImpl::DivisionByZero => ErrorTip::None,
            ErrorImpl::NotCallable { .. } => ErrorTip::None,
            ErrorImpl::ArgumentCount { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::UnsupportedArity { .. } => ErrorTip::Suggestion(String::from(
                "Only calls returning up to two results can be evaluated",
            )),
            ErrorImpl::InvalidArgument { .. } => ErrorTip::None,
            ErrorImpl::HostError { .. } => ErrorTip::None,
            ErrorImpl::CallDepthExceeded { .. } => {
                ErrorTip::Suggestion(String::from("Check for a function that calls itself without end"))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("can't resolve identifier {identifier:?}")]
    UnresolvedIdentifier { identifier: String },
    #[error("variable {variable:?} is not defined")]
    UndefinedVariable { variable: String },
    #[error("variable {variable:?} is already defined")]
    AlreadyDefined { variable: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("unsupported syntax: {node}")]
    UnsupportedNode { node: String },
    #[error("operator {operator} is not supported on {operand}")]
    UnsupportedOperator { operator: String, operand: String },
    #[error("index {index} out of range [0:{length}]")]
    IndexOutOfRange { index: i128, length: usize },
    #[error("index has to be an integer, not {received}")]
    InvalidIndexType { received: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("unknown field or method {field:?}")]
    UnknownField { field: String },
    #[error("invalid literal {literal}: {reason}")]
    InvalidLiteral { literal: String, reason: String },
    #[error("integer divide by zero")]
    DivisionByZero,
    #[error("value of type {received} is not callable")]
    NotCallable { received: String },
    #[error("wrong argument count: expected {expected}, received {received}")]
    ArgumentCount { expected: usize, received: usize },
    #[error("calls returning {results} results are not supported")]
    UnsupportedArity { results: usize },
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("{message}")]
    HostError { message: String },
    #[error("call depth exceeded the limit of {limit}")]
    CallDepthExceeded { limit: usize },
}
