use std::any::Any;

use crate::{lexer::tokens::Token, Span};

use super::{
    ast::{Expr, ExprType, ExprWrapper},
    statements::BlockStmt,
};

// LITERALS

/// Identifier Expression
/// A bare name: a variable, a builtin or a primitive type name.
#[derive(Debug, Clone)]
pub struct IdentExpr {
    pub name: String,
    pub span: Span,
}

impl Expr for IdentExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Ident
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Kinds of literal text the lexer recognises.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LitKind {
    Int,
    Float,
    Char,
    String,
}

/// Basic Literal Expression
/// Holds the literal exactly as written, quotes included. Decoding into a
/// value is left to the evaluator.
#[derive(Debug, Clone)]
pub struct BasicLitExpr {
    pub kind: LitKind,
    pub value: String,
    pub span: Span,
}

impl Expr for BasicLitExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::BasicLit
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Function Literal Expression
/// `func(a, b int) int { ... }`
#[derive(Debug, Clone)]
pub struct FuncLitExpr {
    pub parameters: Vec<(String, ExprWrapper)>,
    pub results: Vec<ExprWrapper>,
    pub body: BlockStmt,
    pub span: Span,
}

impl Expr for FuncLitExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::FuncLit
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Composite Literal Expression
/// `[]T{a, b}` or `map[K]V{k: v}`. Map elements are `KeyValueExpr`s.
#[derive(Debug, Clone)]
pub struct CompositeLitExpr {
    pub literal_type: ExprWrapper,
    pub elements: Vec<ExprWrapper>,
    pub span: Span,
}

impl Expr for CompositeLitExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::CompositeLit
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Key Value Expression
/// A `key: value` element inside a composite literal.
#[derive(Debug, Clone)]
pub struct KeyValueExpr {
    pub key: ExprWrapper,
    pub value: ExprWrapper,
    pub span: Span,
}

impl Expr for KeyValueExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::KeyValue
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

// COMPLEX

/// Binary Expression
/// Represents a binary operation between two expressions in the AST.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: ExprWrapper,
    pub operator: Token,
    pub right: ExprWrapper,
    pub span: Span,
}

impl Expr for BinaryExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Binary
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Prefix Expression
/// Represents a unary prefix operation on an expression in the AST.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: ExprWrapper,
    pub span: Span,
}

impl Expr for PrefixExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Unary
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Selector Expression
/// `target.selector`: a package member, struct field or method.
#[derive(Debug, Clone)]
pub struct SelectorExpr {
    pub target: ExprWrapper,
    pub selector: String,
    pub span: Span,
}

impl Expr for SelectorExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Selector
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Call Expression
/// Represents a function call or a type conversion in the AST.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: ExprWrapper,
    pub arguments: Vec<ExprWrapper>,
    pub span: Span,
}

impl Expr for CallExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Call
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Index Expression
/// `target[index]`
#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub target: ExprWrapper,
    pub index: ExprWrapper,
    pub span: Span,
}

impl Expr for IndexExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Index
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Slice Expression
/// `target[low:high]` where either bound may be left out.
#[derive(Debug, Clone)]
pub struct SliceExpr {
    pub target: ExprWrapper,
    pub low: Option<ExprWrapper>,
    pub high: Option<ExprWrapper>,
    pub span: Span,
}

impl Expr for SliceExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Slice
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Paren Expression
#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub inner: ExprWrapper,
    pub span: Span,
}

impl Expr for ParenExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Paren
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

// TYPES

/// Array Type Expression
/// `[]element`
#[derive(Debug, Clone)]
pub struct ArrayTypeExpr {
    pub element: ExprWrapper,
    pub span: Span,
}

impl Expr for ArrayTypeExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::ArrayType
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Map Type Expression
/// `map[key]value`
#[derive(Debug, Clone)]
pub struct MapTypeExpr {
    pub key: ExprWrapper,
    pub value: ExprWrapper,
    pub span: Span,
}

impl Expr for MapTypeExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::MapType
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Declared direction of a channel type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Channel Type Expression
/// `chan value`, `chan<- value` or `<-chan value`
#[derive(Debug, Clone)]
pub struct ChanTypeExpr {
    pub dir: ChanDir,
    pub value: ExprWrapper,
    pub span: Span,
}

impl Expr for ChanTypeExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::ChanType
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}
