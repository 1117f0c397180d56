//! Error types and error handling.
//!
//! Every tokenizer, parser and evaluator failure is an [`errors::Error`]:
//! a specific [`errors::ErrorImpl`] variant plus the source position it
//! points at. Parse failures and evaluation failures share the type so the
//! shell can present either one the same way.

pub mod errors;
