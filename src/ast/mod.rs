/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Core AST definitions and traits
/// - expressions: Definitions for the expression and type-expression nodes
/// - statements: Definitions for the statement nodes
pub mod ast;
pub mod expressions;
pub mod statements;
