use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Expr, ExprType, ExprWrapper},
        expressions::{
            ArrayTypeExpr, BasicLitExpr, BinaryExpr, CallExpr, ChanTypeExpr, CompositeLitExpr,
            FuncLitExpr, IdentExpr, IndexExpr, KeyValueExpr, LitKind, MapTypeExpr, ParenExpr,
            PrefixExpr, SelectorExpr, SliceExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    stack::ensure_sufficient_stack,
    Span,
};

use super::{
    builtins::builtin_value,
    operators::{binary_op, unary_op},
    scope::Scope,
    stmt::interpret_block,
    types::{convert, lookup_type, Type},
    value::{Closure, Function, MapValue, NativeFunction, SliceValue, Value},
};

/// Borrows `expr` as the node type its tag promises.
fn downcast<'a, T: 'static>(expr: &'a ExprWrapper) -> Result<&'a T, Error> {
    expr.downcast::<T>().ok_or_else(|| {
        Error::at(
            ErrorImpl::UnsupportedNode {
                node: format!("{:?}", expr.get_expr_type()),
            },
            expr.get_span(),
        )
    })
}

/// Evaluates a type expression down to its descriptor.
fn interpret_type(scope: &Scope, expr: &ExprWrapper) -> Result<Type, Error> {
    match interpret_expr(scope, expr)? {
        Value::Type(ty) => Ok(ty),
        other => Err(Error::at(
            ErrorImpl::TypeMismatch {
                expected: String::from("type"),
                received: other.type_of().to_string(),
            },
            expr.get_span(),
        )),
    }
}

/// Closure calls that may be active at once.
pub const MAX_CALL_DEPTH: usize = 1000;

/// Evaluates one expression node.
pub fn interpret_expr(scope: &Scope, expr: &ExprWrapper) -> Result<Value, Error> {
    ensure_sufficient_stack(|| interpret_node(scope, expr))
}

fn interpret_node(scope: &Scope, expr: &ExprWrapper) -> Result<Value, Error> {
    match expr.get_expr_type() {
        ExprType::Ident => interpret_ident(scope, downcast::<IdentExpr>(expr)?),
        ExprType::BasicLit => interpret_basic_lit(downcast::<BasicLitExpr>(expr)?),
        ExprType::Selector => interpret_selector(scope, downcast::<SelectorExpr>(expr)?),
        ExprType::Call => interpret_call(scope, downcast::<CallExpr>(expr)?),
        ExprType::CompositeLit => interpret_composite_lit(scope, downcast::<CompositeLitExpr>(expr)?),
        ExprType::Binary => {
            let binary = downcast::<BinaryExpr>(expr)?;
            let left = interpret_expr(scope, &binary.left)?;
            let right = interpret_expr(scope, &binary.right)?;

            binary_op(&left, binary.operator.kind, &right).map_err(|e| Error::at(e, &binary.span))
        }
        ExprType::Unary => {
            let prefix = downcast::<PrefixExpr>(expr)?;
            let operand = interpret_expr(scope, &prefix.right_expr)?;

            unary_op(prefix.operator.kind, &operand).map_err(|e| Error::at(e, &prefix.span))
        }
        ExprType::ArrayType => {
            let array = downcast::<ArrayTypeExpr>(expr)?;
            let element = interpret_type(scope, &array.element)?;
            Ok(Value::Type(Type::Slice(Box::new(element))))
        }
        ExprType::MapType => {
            let map = downcast::<MapTypeExpr>(expr)?;
            let key = interpret_type(scope, &map.key)?;
            let value = interpret_type(scope, &map.value)?;

            if !key.is_comparable() {
                return Err(Error::at(
                    ErrorImpl::InvalidArgument {
                        message: format!("invalid map key type {}", key),
                    },
                    map.key.get_span(),
                ));
            }

            Ok(Value::Type(Type::Map(Box::new(key), Box::new(value))))
        }
        ExprType::ChanType => {
            // Every channel type is bidirectional, whatever direction was written
            let chan = downcast::<ChanTypeExpr>(expr)?;
            let element = interpret_type(scope, &chan.value)?;
            Ok(Value::Type(Type::Chan(Box::new(element))))
        }
        ExprType::Index => interpret_index(scope, downcast::<IndexExpr>(expr)?),
        ExprType::Slice => interpret_slice(scope, downcast::<SliceExpr>(expr)?),
        ExprType::Paren => interpret_expr(scope, &downcast::<ParenExpr>(expr)?.inner),
        ExprType::FuncLit => {
            let literal = downcast::<FuncLitExpr>(expr)?;
            Ok(Value::Function(Function::Closure(Closure {
                literal: Rc::new(literal.clone()),
                scope: scope.clone(),
            })))
        }
        ExprType::KeyValue => Err(Error::at(
            ErrorImpl::UnsupportedNode {
                node: String::from("key: value outside a composite literal"),
            },
            expr.get_span(),
        )),
    }
}

fn interpret_ident(scope: &Scope, ident: &IdentExpr) -> Result<Value, Error> {
    if let Some(ty) = lookup_type(&ident.name) {
        return Ok(Value::Type(ty));
    }

    scope
        .get(&ident.name)
        .or_else(|| builtin_value(&ident.name))
        .ok_or_else(|| {
            Error::at(
                ErrorImpl::UnresolvedIdentifier {
                    identifier: ident.name.clone(),
                },
                &ident.span,
            )
        })
}

fn interpret_basic_lit(literal: &BasicLitExpr) -> Result<Value, Error> {
    let invalid = |reason: String| {
        Error::at(
            ErrorImpl::InvalidLiteral {
                literal: literal.value.clone(),
                reason,
            },
            &literal.span,
        )
    };

    let text = literal.value.as_str();

    match literal.kind {
        LitKind::Int => text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| invalid(e.to_string())),
        LitKind::Float => text
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| invalid(e.to_string())),
        // Only the first byte after the quote; escapes are not decoded
        LitKind::Char => match text.as_bytes().get(1) {
            Some(byte) if text.len() >= 3 => Ok(Value::Int32(*byte as i32)),
            _ => Err(invalid(String::from("empty character literal"))),
        },
        // Quotes are stripped verbatim
        LitKind::String => match text.get(1..text.len().saturating_sub(1)) {
            Some(inner) if text.len() >= 2 => Ok(Value::String(inner.to_string())),
            _ => Err(invalid(String::from("unterminated string literal"))),
        },
    }
}

fn interpret_selector(scope: &Scope, selector: &SelectorExpr) -> Result<Value, Error> {
    let target = interpret_expr(scope, &selector.target)?;
    let unknown = || {
        Error::at(
            ErrorImpl::UnknownField {
                field: selector.selector.clone(),
            },
            &selector.span,
        )
    };

    match target {
        Value::Package(package) => package
            .functions
            .get(&selector.selector)
            .cloned()
            .map(Value::Function)
            .ok_or_else(unknown),
        Value::Struct(instance) => instance
            .field(&selector.selector)
            .or_else(|| instance.method(&selector.selector).map(Value::Function))
            .ok_or_else(unknown),
        other => Err(Error::at(
            ErrorImpl::TypeMismatch {
                expected: String::from("struct or package"),
                received: other.type_of().to_string(),
            },
            selector.target.get_span(),
        )),
    }
}

fn interpret_call(scope: &Scope, call: &CallExpr) -> Result<Value, Error> {
    let callee = interpret_expr(scope, &call.callee)?;

    let mut args = Vec::with_capacity(call.arguments.len());
    for argument in call.arguments.iter() {
        args.push(interpret_expr(scope, argument)?);
    }

    match callee {
        Value::Type(ty) => {
            if args.len() != 1 {
                return Err(Error::at(
                    ErrorImpl::ArgumentCount {
                        expected: 1,
                        received: args.len(),
                    },
                    &call.span,
                ));
            }

            trace!(target_type = %ty, "conversion");
            convert(&args[0], &ty).map_err(|e| Error::at(e, &call.span))
        }
        Value::Function(Function::Closure(closure)) => call_closure(scope, &closure, args, &call.span),
        Value::Function(Function::Native(native)) => call_native(&native, args, &call.span),
        other => Err(Error::at(
            ErrorImpl::NotCallable {
                received: other.type_of().to_string(),
            },
            &call.span,
        )),
    }
}

/// Runs a closure body in a fresh child of its captured scope with the
/// parameters bound. `caller` is the scope the call expression ran in.
fn call_closure(caller: &Scope, closure: &Closure, args: Vec<Value>, span: &Span) -> Result<Value, Error> {
    let literal = &closure.literal;

    let call_depth = caller.call_depth() + 1;
    if call_depth > MAX_CALL_DEPTH {
        return Err(Error::at(
            ErrorImpl::CallDepthExceeded {
                limit: MAX_CALL_DEPTH,
            },
            span,
        ));
    }

    if args.len() != literal.parameters.len() {
        return Err(Error::at(
            ErrorImpl::ArgumentCount {
                expected: literal.parameters.len(),
                received: args.len(),
            },
            span,
        ));
    }

    let call_scope = Scope::for_call(&closure.scope, call_depth);
    for ((name, type_expr), arg) in literal.parameters.iter().zip(args) {
        let parameter_type = interpret_type(&closure.scope, type_expr)?;
        if !parameter_type.accepts(&arg) {
            return Err(Error::at(
                ErrorImpl::TypeMismatch {
                    expected: parameter_type.to_string(),
                    received: arg.type_of().to_string(),
                },
                span,
            ));
        }

        if name != "_" {
            call_scope.declare(name, arg);
        }
    }

    debug!(parameters = literal.parameters.len(), "calling closure");
    let result = interpret_block(&call_scope, &literal.body)?;

    check_results(&closure.scope, literal, result, span)
}

fn check_results(scope: &Scope, literal: &FuncLitExpr, result: Value, span: &Span) -> Result<Value, Error> {
    let mismatch = |expected: &Type, received: &Value| {
        Error::at(
            ErrorImpl::TypeMismatch {
                expected: expected.to_string(),
                received: received.type_of().to_string(),
            },
            span,
        )
    };

    match literal.results.as_slice() {
        [] => Ok(Value::Nil),
        [single] => {
            let expected = interpret_type(scope, single)?;
            if expected.accepts(&result) {
                Ok(result)
            } else {
                Err(mismatch(&expected, &result))
            }
        }
        many => {
            let items = match &result {
                Value::Slice(slice) if slice.elem == Type::Any && slice.len() == many.len() => slice.to_vec(),
                Value::Slice(slice) if slice.elem == Type::Any => {
                    return Err(Error::at(
                        ErrorImpl::ArgumentCount {
                            expected: many.len(),
                            received: slice.len(),
                        },
                        span,
                    ))
                }
                _ => {
                    return Err(Error::at(
                        ErrorImpl::ArgumentCount {
                            expected: many.len(),
                            received: 1,
                        },
                        span,
                    ))
                }
            };

            for (type_expr, item) in many.iter().zip(items.iter()) {
                let expected = interpret_type(scope, type_expr)?;
                if !expected.accepts(item) {
                    return Err(mismatch(&expected, item));
                }
            }

            Ok(result)
        }
    }
}

fn call_native(native: &NativeFunction, args: Vec<Value>, span: &Span) -> Result<Value, Error> {
    debug!(function = %native.name, args = args.len(), "calling native function");

    let mut results = native.call(args).map_err(|e| Error::at(e, span))?;

    match results.len() {
        0 => Ok(Value::Nil),
        1 => Ok(results.remove(0)),
        2 => match results.remove(1) {
            Value::Error(message) => Err(Error::at(ErrorImpl::HostError { message }, span)),
            _ => Ok(results.remove(0)),
        },
        n => Err(Error::at(ErrorImpl::UnsupportedArity { results: n }, span)),
    }
}

fn interpret_composite_lit(scope: &Scope, composite: &CompositeLitExpr) -> Result<Value, Error> {
    let literal_type = interpret_type(scope, &composite.literal_type)?;

    let check = |expected: &Type, value: &Value, expr: &ExprWrapper| {
        if expected.accepts(value) {
            Ok(())
        } else {
            Err(Error::at(
                ErrorImpl::TypeMismatch {
                    expected: expected.to_string(),
                    received: value.type_of().to_string(),
                },
                expr.get_span(),
            ))
        }
    };

    match literal_type {
        Type::Slice(elem) => {
            let mut items = Vec::with_capacity(composite.elements.len());
            for element in composite.elements.iter() {
                let value = interpret_expr(scope, element)?;
                check(&elem, &value, element)?;
                items.push(value);
            }
            Ok(Value::Slice(SliceValue::new(*elem, items)))
        }
        Type::Map(key_type, value_type) => {
            let map = MapValue::new(*key_type, *value_type);
            for element in composite.elements.iter() {
                let pair = element.downcast::<KeyValueExpr>().ok_or_else(|| {
                    Error::at(
                        ErrorImpl::InvalidArgument {
                            message: String::from("map literal elements must be key: value pairs"),
                        },
                        element.get_span(),
                    )
                })?;

                let key = interpret_expr(scope, &pair.key)?;
                check(&map.key, &key, &pair.key)?;
                let value = interpret_expr(scope, &pair.value)?;
                check(&map.value, &value, &pair.value)?;

                map.insert(key, value);
            }
            Ok(Value::Map(map))
        }
        other => Err(Error::at(
            ErrorImpl::UnsupportedNode {
                node: format!("composite literal of type {}", other),
            },
            &composite.span,
        )),
    }
}

/// An index or slice bound of any integer kind.
fn interpret_bound(scope: &Scope, expr: &ExprWrapper) -> Result<i128, Error> {
    let value = interpret_expr(scope, expr)?;
    value.as_integer().ok_or_else(|| {
        Error::at(
            ErrorImpl::InvalidIndexType {
                received: value.type_of().to_string(),
            },
            expr.get_span(),
        )
    })
}

fn check_index(index: i128, length: usize, span: &Span) -> Result<usize, Error> {
    match usize::try_from(index) {
        Ok(position) if position < length => Ok(position),
        _ => Err(Error::at(ErrorImpl::IndexOutOfRange { index, length }, span)),
    }
}

fn interpret_index(scope: &Scope, index_expr: &IndexExpr) -> Result<Value, Error> {
    let target = interpret_expr(scope, &index_expr.target)?;

    match target {
        Value::Map(map) => {
            let key = interpret_expr(scope, &index_expr.index)?;
            if !map.key.accepts(&key) {
                return Err(Error::at(
                    ErrorImpl::TypeMismatch {
                        expected: map.key.to_string(),
                        received: key.type_of().to_string(),
                    },
                    index_expr.index.get_span(),
                ));
            }

            // A missing key reads as the zero value
            Ok(map.get(&key).unwrap_or_else(|| map.value.zero_value()))
        }
        Value::Slice(slice) => {
            let index = interpret_bound(scope, &index_expr.index)?;
            let position = check_index(index, slice.len(), &index_expr.span)?;
            slice
                .get(position)
                .ok_or_else(|| Error::at(ErrorImpl::IndexOutOfRange { index, length: slice.len() }, &index_expr.span))
        }
        Value::String(string) => {
            let index = interpret_bound(scope, &index_expr.index)?;
            let position = check_index(index, string.len(), &index_expr.span)?;
            Ok(Value::Uint8(string.as_bytes()[position]))
        }
        other => Err(Error::at(
            ErrorImpl::UnsupportedOperator {
                operator: String::from("index"),
                operand: other.type_of().to_string(),
            },
            index_expr.target.get_span(),
        )),
    }
}

fn not_sliceable(target: &Value, expr: &ExprWrapper) -> Error {
    Error::at(
        ErrorImpl::UnsupportedOperator {
            operator: String::from("slice"),
            operand: target.type_of().to_string(),
        },
        expr.get_span(),
    )
}

fn interpret_slice(scope: &Scope, slice_expr: &SliceExpr) -> Result<Value, Error> {
    let target = interpret_expr(scope, &slice_expr.target)?;

    let length = match &target {
        Value::Slice(slice) => slice.len(),
        Value::String(string) => string.len(),
        other => return Err(not_sliceable(other, &slice_expr.target)),
    };

    let low = match &slice_expr.low {
        Some(low) => interpret_bound(scope, low)?,
        None => 0,
    };
    let high = match &slice_expr.high {
        Some(high) => interpret_bound(scope, high)?,
        None => length as i128,
    };

    // Half-open bounds: 0 <= low <= high <= length
    if high < 0 || high > length as i128 {
        return Err(Error::at(ErrorImpl::IndexOutOfRange { index: high, length }, &slice_expr.span));
    }
    if low < 0 || low > high {
        return Err(Error::at(ErrorImpl::IndexOutOfRange { index: low, length }, &slice_expr.span));
    }
    let (low, high) = (low as usize, high as usize);

    match target {
        Value::Slice(slice) => {
            let items = slice.to_vec()[low..high].to_vec();
            Ok(Value::Slice(SliceValue::new(slice.elem, items)))
        }
        // Strings hold valid UTF-8, so a bound inside a character is rejected
        Value::String(string) => match string.get(low..high) {
            Some(sliced) => Ok(Value::String(sliced.to_string())),
            None => Err(Error::at(
                ErrorImpl::InvalidArgument {
                    message: format!("slice bounds [{}:{}] split a multi-byte character", low, high),
                },
                &slice_expr.span,
            )),
        },
        other => Err(not_sliceable(&other, &slice_expr.target)),
    }
}
