//! Type descriptors, the primitive type registry and conversions.

use std::{collections::HashMap, fmt::Display};

use lazy_static::lazy_static;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::value::{MapValue, SliceValue, Value};

/// A first-class runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Error,
    Slice(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Chan(Box<Type>),
    Struct(String),
    Func,
    Package,
    Type,
    Nil,
    /// The empty interface; holds values of any type.
    Any,
}

lazy_static! {
    static ref TYPE_REGISTRY: HashMap<&'static str, Type> = {
        let mut map = HashMap::new();
        map.insert("bool", Type::Bool);
        map.insert("byte", Type::Uint8);
        map.insert("rune", Type::Int32);
        map.insert("string", Type::String);
        map.insert("int", Type::Int);
        map.insert("int8", Type::Int8);
        map.insert("int16", Type::Int16);
        map.insert("int32", Type::Int32);
        map.insert("int64", Type::Int64);
        map.insert("uint", Type::Uint);
        map.insert("uint8", Type::Uint8);
        map.insert("uint16", Type::Uint16);
        map.insert("uint32", Type::Uint32);
        map.insert("uint64", Type::Uint64);
        map.insert("uintptr", Type::Uintptr);
        map.insert("float32", Type::Float32);
        map.insert("float64", Type::Float64);
        map.insert("complex64", Type::Complex64);
        map.insert("complex128", Type::Complex128);
        map.insert("error", Type::Error);
        map
    };
}

/// Looks up a primitive type by name.
pub fn lookup_type(name: &str) -> Option<Type> {
    TYPE_REGISTRY.get(name).cloned()
}

/// Returns the type descriptor for a primitive type name, e.g. `"int"`.
pub fn string_to_type(name: &str) -> Result<Type, Error> {
    lookup_type(name).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownType {
                type_: name.to_string(),
            },
            Position::null(),
        )
    })
}

impl Type {
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Type::Int | Type::Int8 | Type::Int16 | Type::Int32 | Type::Int64
        )
    }

    pub fn is_integer(&self) -> bool {
        self.is_signed()
            || matches!(
                self,
                Type::Uint | Type::Uint8 | Type::Uint16 | Type::Uint32 | Type::Uint64 | Type::Uintptr
            )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float32 | Type::Float64)
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Type::Complex64 | Type::Complex128)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_float() || self.is_complex()
    }

    /// Whether `==` is defined on values of this type.
    pub fn is_comparable(&self) -> bool {
        !matches!(
            self,
            Type::Slice(_) | Type::Map(_, _) | Type::Func | Type::Package | Type::Struct(_)
        )
    }

    fn is_nillable(&self) -> bool {
        matches!(
            self,
            Type::Error | Type::Slice(_) | Type::Map(_, _) | Type::Chan(_) | Type::Func | Type::Nil
        )
    }

    /// Whether `value` can be stored in a slot of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Type::Any, _) => true,
            (_, Value::Nil) => self.is_nillable(),
            _ => value.type_of() == *self,
        }
    }

    /// The value a slot of this type holds before anything is stored in it.
    pub fn zero_value(&self) -> Value {
        match self {
            Type::Bool => Value::Bool(false),
            Type::Int => Value::Int(0),
            Type::Int8 => Value::Int8(0),
            Type::Int16 => Value::Int16(0),
            Type::Int32 => Value::Int32(0),
            Type::Int64 => Value::Int64(0),
            Type::Uint => Value::Uint(0),
            Type::Uint8 => Value::Uint8(0),
            Type::Uint16 => Value::Uint16(0),
            Type::Uint32 => Value::Uint32(0),
            Type::Uint64 => Value::Uint64(0),
            Type::Uintptr => Value::Uintptr(0),
            Type::Float32 => Value::Float32(0.0),
            Type::Float64 => Value::Float64(0.0),
            Type::Complex64 => Value::Complex64(0.0, 0.0),
            Type::Complex128 => Value::Complex128(0.0, 0.0),
            Type::String => Value::String(String::new()),
            Type::Slice(elem) => Value::Slice(SliceValue::new(elem.as_ref().clone(), vec![])),
            Type::Map(key, value) => Value::Map(MapValue::new(
                key.as_ref().clone(),
                value.as_ref().clone(),
            )),
            Type::Error
            | Type::Chan(_)
            | Type::Struct(_)
            | Type::Func
            | Type::Package
            | Type::Type
            | Type::Nil
            | Type::Any => Value::Nil,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Int8 => write!(f, "int8"),
            Type::Int16 => write!(f, "int16"),
            Type::Int32 => write!(f, "int32"),
            Type::Int64 => write!(f, "int64"),
            Type::Uint => write!(f, "uint"),
            Type::Uint8 => write!(f, "uint8"),
            Type::Uint16 => write!(f, "uint16"),
            Type::Uint32 => write!(f, "uint32"),
            Type::Uint64 => write!(f, "uint64"),
            Type::Uintptr => write!(f, "uintptr"),
            Type::Float32 => write!(f, "float32"),
            Type::Float64 => write!(f, "float64"),
            Type::Complex64 => write!(f, "complex64"),
            Type::Complex128 => write!(f, "complex128"),
            Type::String => write!(f, "string"),
            Type::Error => write!(f, "error"),
            Type::Slice(elem) => write!(f, "[]{}", elem),
            Type::Map(key, value) => write!(f, "map[{}]{}", key, value),
            Type::Chan(elem) => write!(f, "chan {}", elem),
            Type::Struct(name) => write!(f, "{}", name),
            Type::Func => write!(f, "func"),
            Type::Package => write!(f, "package"),
            Type::Type => write!(f, "type"),
            Type::Nil => write!(f, "nil"),
            Type::Any => write!(f, "interface {{}}"),
        }
    }
}

/// Numeric view of a value used while converting between kinds.
enum Number {
    Integer(i128),
    Float(f64),
    Complex(f64, f64),
}

fn number_of(value: &Value) -> Option<Number> {
    if let Some(integer) = value.as_integer() {
        return Some(Number::Integer(integer));
    }

    match value {
        Value::Float32(v) => Some(Number::Float(*v as f64)),
        Value::Float64(v) => Some(Number::Float(*v)),
        Value::Complex64(re, im) => Some(Number::Complex(*re as f64, *im as f64)),
        Value::Complex128(re, im) => Some(Number::Complex(*re, *im)),
        _ => None,
    }
}

// Integer targets truncate to their width, float sources truncate toward zero
fn integer_to(value: i128, target: &Type) -> Option<Value> {
    Some(match target {
        Type::Int => Value::Int(value as i64),
        Type::Int8 => Value::Int8(value as i8),
        Type::Int16 => Value::Int16(value as i16),
        Type::Int32 => Value::Int32(value as i32),
        Type::Int64 => Value::Int64(value as i64),
        Type::Uint => Value::Uint(value as u64),
        Type::Uint8 => Value::Uint8(value as u8),
        Type::Uint16 => Value::Uint16(value as u16),
        Type::Uint32 => Value::Uint32(value as u32),
        Type::Uint64 => Value::Uint64(value as u64),
        Type::Uintptr => Value::Uintptr(value as u64),
        Type::Float32 => Value::Float32(value as f32),
        Type::Float64 => Value::Float64(value as f64),
        Type::Complex64 => Value::Complex64(value as f32, 0.0),
        Type::Complex128 => Value::Complex128(value as f64, 0.0),
        _ => return None,
    })
}

fn float_to(value: f64, target: &Type) -> Option<Value> {
    match target {
        Type::Float32 => Some(Value::Float32(value as f32)),
        Type::Float64 => Some(Value::Float64(value)),
        Type::Complex64 => Some(Value::Complex64(value as f32, 0.0)),
        Type::Complex128 => Some(Value::Complex128(value, 0.0)),
        _ if target.is_integer() => integer_to(value.trunc() as i128, target),
        _ => None,
    }
}

fn complex_to(re: f64, im: f64, target: &Type) -> Option<Value> {
    match target {
        Type::Complex64 => Some(Value::Complex64(re as f32, im as f32)),
        Type::Complex128 => Some(Value::Complex128(re, im)),
        _ => None,
    }
}

/// Converts `value` to `target` the way a `T(x)` expression does.
pub fn convert(value: &Value, target: &Type) -> Result<Value, ErrorImpl> {
    let mismatch = || ErrorImpl::TypeMismatch {
        expected: target.to_string(),
        received: value.type_of().to_string(),
    };

    if value.type_of() == *target {
        return Ok(value.clone());
    }

    if target.is_numeric() {
        let converted = match number_of(value) {
            Some(Number::Integer(integer)) => integer_to(integer, target),
            Some(Number::Float(float)) => float_to(float, target),
            Some(Number::Complex(re, im)) => complex_to(re, im, target),
            None => None,
        };
        return converted.ok_or_else(mismatch);
    }

    match (value, target) {
        (_, Type::String) if value.type_of().is_integer() => {
            let code = value.as_integer().unwrap_or(-1);
            let character = u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            Ok(Value::String(character.to_string()))
        }
        (Value::Slice(slice), Type::String) => match slice.elem {
            Type::Uint8 => {
                let bytes: Vec<u8> = slice
                    .to_vec()
                    .iter()
                    .filter_map(|item| match item {
                        Value::Uint8(byte) => Some(*byte),
                        _ => None,
                    })
                    .collect();
                Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Type::Int32 => Ok(Value::String(
                slice
                    .to_vec()
                    .iter()
                    .filter_map(|item| match item {
                        Value::Int32(rune) => Some(
                            u32::try_from(*rune)
                                .ok()
                                .and_then(char::from_u32)
                                .unwrap_or(char::REPLACEMENT_CHARACTER),
                        ),
                        _ => None,
                    })
                    .collect(),
            )),
            _ => Err(mismatch()),
        },
        (Value::String(string), Type::Slice(elem)) => match elem.as_ref() {
            Type::Uint8 => Ok(Value::Slice(SliceValue::new(
                Type::Uint8,
                string.bytes().map(Value::Uint8).collect(),
            ))),
            Type::Int32 => Ok(Value::Slice(SliceValue::new(
                Type::Int32,
                string.chars().map(|c| Value::Int32(c as i32)).collect(),
            ))),
            _ => Err(mismatch()),
        },
        _ => Err(mismatch()),
    }
}
