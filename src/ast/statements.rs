use std::{any::Any, slice::Iter};

use crate::Span;

use super::ast::{Expr, ExprWrapper, Stmt, StmtType, StmtWrapper};

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<StmtWrapper>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, StmtWrapper> {
        self.body.iter()
    }
}

impl Stmt for BlockStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::BlockStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

#[derive(Debug)]
pub struct ExpressionStmt {
    pub expression: ExprWrapper,
    pub span: Span,
}

impl Stmt for ExpressionStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ExpressionStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        self.expression.to_stmt_wrapper()
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub results: Vec<ExprWrapper>,
    pub span: Span,
}

impl Stmt for ReturnStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::ReturnStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// `identifier := value` when `define` is set, `identifier = value` otherwise.
///
/// Only bare identifiers can be targets; the parser rejects anything else.
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub identifier: String,
    pub define: bool,
    pub value: ExprWrapper,
    pub span: Span,
}

impl Stmt for AssignStmt {
    fn get_stmt_type(&self) -> StmtType {
        StmtType::AssignStmt
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn clone_wrapper(&self) -> StmtWrapper {
        StmtWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}
