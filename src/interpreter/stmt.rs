use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Expr, Stmt, StmtType, StmtWrapper},
        statements::{AssignStmt, BlockStmt, ExpressionStmt, ReturnStmt},
    },
    errors::errors::{Error, ErrorImpl},
    stack::ensure_sufficient_stack,
};

use super::{
    expr::interpret_expr,
    scope::Scope,
    types::Type,
    value::{SliceValue, Value},
};

/// Evaluates one statement node.
pub fn interpret_stmt(scope: &Scope, stmt: &StmtWrapper) -> Result<Value, Error> {
    ensure_sufficient_stack(|| interpret_stmt_kind(scope, stmt))
}

fn interpret_stmt_kind(scope: &Scope, stmt: &StmtWrapper) -> Result<Value, Error> {
    let unsupported = || {
        Error::at(
            ErrorImpl::UnsupportedNode {
                node: format!("{:?}", stmt.get_stmt_type()),
            },
            stmt.get_span(),
        )
    };

    match stmt.get_stmt_type() {
        StmtType::BlockStmt => {
            let block = stmt.downcast::<BlockStmt>().ok_or_else(unsupported)?;
            interpret_block(scope, block)
        }
        StmtType::ReturnStmt => {
            let return_stmt = stmt.downcast::<ReturnStmt>().ok_or_else(unsupported)?;

            let mut results = Vec::with_capacity(return_stmt.results.len());
            for result in return_stmt.results.iter() {
                results.push(interpret_expr(scope, result)?);
            }

            match results.len() {
                0 => Ok(Value::Nil),
                1 => Ok(results.remove(0)),
                _ => Ok(Value::Slice(SliceValue::new(Type::Any, results))),
            }
        }
        StmtType::ExpressionStmt => {
            let expression = stmt.downcast::<ExpressionStmt>().ok_or_else(unsupported)?;
            interpret_expr(scope, &expression.expression)
        }
        StmtType::AssignStmt => {
            let assign = stmt.downcast::<AssignStmt>().ok_or_else(unsupported)?;
            interpret_assign(scope, assign)
        }
    }
}

/// Runs statements in order in `scope`; the block's value is the value of
/// its last statement. The first error stops the block, and earlier
/// statements keep their effects.
pub fn interpret_block(scope: &Scope, block: &BlockStmt) -> Result<Value, Error> {
    let mut value = Value::Nil;

    for (index, stmt) in block.iter().enumerate() {
        trace!(index, kind = ?stmt.get_stmt_type(), "statement");
        value = interpret_stmt(scope, stmt)?;
    }

    Ok(value)
}

/// `name := value` declares, `name = value` reassigns with the same type.
/// Either way the binding lands in `scope`'s own mapping.
pub fn interpret_assign(scope: &Scope, assign: &AssignStmt) -> Result<Value, Error> {
    let previous = scope.get_declared(&assign.identifier);

    match (assign.define, &previous) {
        (true, Some(_)) => {
            return Err(Error::at(
                ErrorImpl::AlreadyDefined {
                    variable: assign.identifier.clone(),
                },
                &assign.span,
            ))
        }
        (false, None) => {
            return Err(Error::at(
                ErrorImpl::UndefinedVariable {
                    variable: assign.identifier.clone(),
                },
                &assign.span,
            ))
        }
        _ => {}
    }

    let value = interpret_expr(scope, &assign.value)?;

    if let Some(previous) = previous {
        if previous.type_of() != value.type_of() {
            return Err(Error::at(
                ErrorImpl::TypeMismatch {
                    expected: previous.type_of().to_string(),
                    received: value.type_of().to_string(),
                },
                assign.value.get_span(),
            ));
        }
    }

    debug!(
        variable = %assign.identifier,
        define = assign.define,
        value_type = %value.type_of(),
        "binding"
    );
    scope.declare(&assign.identifier, value.clone());

    Ok(value)
}
