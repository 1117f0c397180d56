//! The builtin bindings: `nil`, `true`, `false`, `append` and `make`.

use tracing::trace;

use crate::errors::errors::ErrorImpl;

use super::{
    types::Type,
    value::{ChanValue, Function, MapValue, SliceValue, Value},
};

pub const BUILTIN_NAMES: [&str; 5] = ["nil", "true", "false", "append", "make"];

pub fn builtin_value(name: &str) -> Option<Value> {
    match name {
        "nil" => Some(Value::Nil),
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "append" => Some(Value::Function(Function::native("append", |args| {
            append(args).map(|value| vec![value])
        }))),
        "make" => Some(Value::Function(Function::native("make", |args| {
            make(args).map(|value| vec![value])
        }))),
        _ => None,
    }
}

/// `append(slice, values...)`: a new slice holding the old elements then
/// `values`. The argument slice is left untouched.
pub fn append(args: Vec<Value>) -> Result<Value, ErrorImpl> {
    let mut args = args.into_iter();

    let slice = match args.next() {
        Some(Value::Slice(slice)) => slice,
        Some(other) => {
            return Err(ErrorImpl::InvalidArgument {
                message: format!("first argument to append must be a slice, not {}", other.type_of()),
            })
        }
        None => {
            return Err(ErrorImpl::ArgumentCount {
                expected: 1,
                received: 0,
            })
        }
    };

    let mut items = slice.to_vec();
    for value in args {
        if !slice.elem.accepts(&value) {
            return Err(ErrorImpl::TypeMismatch {
                expected: slice.elem.to_string(),
                received: value.type_of().to_string(),
            });
        }
        items.push(value);
    }

    trace!(elem = %slice.elem, len = items.len(), "append");
    Ok(Value::Slice(SliceValue::new(slice.elem, items)))
}

fn size_argument(value: &Value, what: &str) -> Result<usize, ErrorImpl> {
    let size = value.as_integer().ok_or_else(|| ErrorImpl::InvalidArgument {
        message: format!("{} must be an integer, not {}", what, value.type_of()),
    })?;

    usize::try_from(size).map_err(|_| ErrorImpl::InvalidArgument {
        message: format!("{} {} must not be negative", what, size),
    })
}

/// `make(T, sizes...)` for slice, map and channel types.
pub fn make(args: Vec<Value>) -> Result<Value, ErrorImpl> {
    let (ty, sizes) = match args.split_first() {
        Some((Value::Type(ty), sizes)) => (ty.clone(), sizes),
        Some((other, _)) => {
            return Err(ErrorImpl::InvalidArgument {
                message: format!("first argument to make must be a type, not {}", other.type_of()),
            })
        }
        None => {
            return Err(ErrorImpl::ArgumentCount {
                expected: 1,
                received: 0,
            })
        }
    };

    trace!(%ty, sizes = sizes.len(), "make");

    match ty {
        Type::Slice(elem) => {
            let (len, cap) = match sizes {
                [] => {
                    return Err(ErrorImpl::ArgumentCount {
                        expected: 1,
                        received: 0,
                    })
                }
                [len] => {
                    let len = size_argument(len, "len")?;
                    (len, len)
                }
                [len, cap] => (size_argument(len, "len")?, size_argument(cap, "cap")?),
                _ => {
                    return Err(ErrorImpl::ArgumentCount {
                        expected: 2,
                        received: sizes.len(),
                    })
                }
            };

            if len > cap {
                return Err(ErrorImpl::InvalidArgument {
                    message: format!("len larger than cap in make({})", Type::Slice(elem)),
                });
            }

            // Only `len` elements are stored; `cap` is never preallocated
            let mut items = Vec::new();
            items.try_reserve_exact(len).map_err(|_| ErrorImpl::InvalidArgument {
                message: format!("len {} out of range", len),
            })?;
            items.resize(len, elem.zero_value());
            Ok(Value::Slice(SliceValue::new(*elem, items)))
        }
        Type::Map(key, value) => {
            match sizes {
                [] => {}
                [hint] => {
                    size_argument(hint, "size")?;
                }
                _ => {
                    return Err(ErrorImpl::ArgumentCount {
                        expected: 1,
                        received: sizes.len(),
                    })
                }
            }
            Ok(Value::Map(MapValue::new(*key, *value)))
        }
        Type::Chan(elem) => {
            let capacity = match sizes {
                [] => 0,
                [capacity] => size_argument(capacity, "buffer size")?,
                _ => {
                    return Err(ErrorImpl::ArgumentCount {
                        expected: 1,
                        received: sizes.len(),
                    })
                }
            };
            Ok(Value::Chan(ChanValue::new(*elem, capacity)))
        }
        other => Err(ErrorImpl::InvalidArgument {
            message: format!("cannot make {}", other),
        }),
    }
}
