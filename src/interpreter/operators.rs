//! Binary and unary operator semantics.
//!
//! Operands must have exactly the same type; nothing is widened implicitly.
//! Shift counts are the exception and may be any non-negative integer.

use crate::{errors::errors::ErrorImpl, lexer::tokens::TokenKind};

use super::value::Value;

fn operator_symbol(operator: TokenKind) -> &'static str {
    match operator {
        TokenKind::Plus => "+",
        TokenKind::Dash => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::Ampersand => "&",
        TokenKind::Pipe => "|",
        TokenKind::Caret => "^",
        TokenKind::AndNot => "&^",
        TokenKind::ShiftLeft => "<<",
        TokenKind::ShiftRight => ">>",
        TokenKind::And => "&&",
        TokenKind::Or => "||",
        TokenKind::Equals => "==",
        TokenKind::NotEquals => "!=",
        TokenKind::Less => "<",
        TokenKind::LessEquals => "<=",
        TokenKind::Greater => ">",
        TokenKind::GreaterEquals => ">=",
        TokenKind::Not => "!",
        TokenKind::Arrow => "<-",
        _ => "?",
    }
}

fn unsupported(operator: TokenKind, operand: &Value) -> ErrorImpl {
    ErrorImpl::UnsupportedOperator {
        operator: operator_symbol(operator).to_string(),
        operand: operand.type_of().to_string(),
    }
}

fn mismatch(left: &Value, right: &Value) -> ErrorImpl {
    ErrorImpl::TypeMismatch {
        expected: left.type_of().to_string(),
        received: right.type_of().to_string(),
    }
}

macro_rules! compare {
    ($l:expr, $r:expr, $op:expr) => {
        match $op {
            TokenKind::Less => Some(Value::Bool($l < $r)),
            TokenKind::LessEquals => Some(Value::Bool($l <= $r)),
            TokenKind::Greater => Some(Value::Bool($l > $r)),
            TokenKind::GreaterEquals => Some(Value::Bool($l >= $r)),
            _ => None,
        }
    };
}

// Wrapping arithmetic, bitwise operators and ordering on one integer kind
macro_rules! integer_op {
    ($l:expr, $r:expr, $op:expr, $variant:path) => {{
        let (l, r) = ($l, $r);
        match $op {
            TokenKind::Plus => Ok($variant(l.wrapping_add(r))),
            TokenKind::Dash => Ok($variant(l.wrapping_sub(r))),
            TokenKind::Star => Ok($variant(l.wrapping_mul(r))),
            TokenKind::Slash if r == 0 => Err(Some(ErrorImpl::DivisionByZero)),
            TokenKind::Slash => Ok($variant(l.wrapping_div(r))),
            TokenKind::Percent if r == 0 => Err(Some(ErrorImpl::DivisionByZero)),
            TokenKind::Percent => Ok($variant(l.wrapping_rem(r))),
            TokenKind::Ampersand => Ok($variant(l & r)),
            TokenKind::Pipe => Ok($variant(l | r)),
            TokenKind::Caret => Ok($variant(l ^ r)),
            TokenKind::AndNot => Ok($variant(l & !r)),
            op => compare!(l, r, op).ok_or(None),
        }
    }};
}

macro_rules! float_op {
    ($l:expr, $r:expr, $op:expr, $variant:path) => {{
        let (l, r) = ($l, $r);
        match $op {
            TokenKind::Plus => Ok($variant(l + r)),
            TokenKind::Dash => Ok($variant(l - r)),
            TokenKind::Star => Ok($variant(l * r)),
            TokenKind::Slash => Ok($variant(l / r)),
            op => compare!(l, r, op).ok_or(None),
        }
    }};
}

macro_rules! complex_op {
    ($l:expr, $r:expr, $op:expr, $variant:path) => {{
        let ((a, b), (c, d)) = ($l, $r);
        match $op {
            TokenKind::Plus => Some($variant(a + c, b + d)),
            TokenKind::Dash => Some($variant(a - c, b - d)),
            TokenKind::Star => Some($variant(a * c - b * d, a * d + b * c)),
            TokenKind::Slash => {
                let denominator = c * c + d * d;
                Some($variant(
                    (a * c + b * d) / denominator,
                    (b * c - a * d) / denominator,
                ))
            }
            _ => None,
        }
    }};
}

// Shifting by at least the width yields 0, or -1 for negative signed values
macro_rules! shift {
    ($l:expr, $count:expr, $op:expr, $variant:path, $ty:ty) => {{
        let l: $ty = $l;
        let count = u32::try_from($count).unwrap_or(u32::MAX);
        let shifted = match $op {
            TokenKind::ShiftLeft => l.checked_shl(count).unwrap_or(0),
            _ => l
                .checked_shr(count)
                .unwrap_or((l >> (<$ty>::BITS - 1)) >> 1),
        };
        $variant(shifted)
    }};
}

/// `==` on two values. `nil` only equals `nil`.
pub fn values_equal(left: &Value, right: &Value) -> Result<bool, ErrorImpl> {
    match (left, right) {
        (Value::Nil, Value::Nil) => return Ok(true),
        (Value::Nil, _) | (_, Value::Nil) => return Ok(false),
        _ => {}
    }

    if left.type_of() != right.type_of() {
        return Err(mismatch(left, right));
    }

    if !left.type_of().is_comparable() {
        return Err(unsupported(TokenKind::Equals, left));
    }

    Ok(left == right)
}

fn shift_op(left: &Value, operator: TokenKind, right: &Value) -> Result<Value, ErrorImpl> {
    let count = match right.as_integer() {
        Some(count) if count < 0 => {
            return Err(ErrorImpl::InvalidArgument {
                message: format!("negative shift count {}", count),
            })
        }
        Some(count) => count,
        None => {
            return Err(ErrorImpl::InvalidArgument {
                message: format!("shift count must be an integer, not {}", right.type_of()),
            })
        }
    };

    Ok(match left {
        Value::Int(l) => shift!(*l, count, operator, Value::Int, i64),
        Value::Int8(l) => shift!(*l, count, operator, Value::Int8, i8),
        Value::Int16(l) => shift!(*l, count, operator, Value::Int16, i16),
        Value::Int32(l) => shift!(*l, count, operator, Value::Int32, i32),
        Value::Int64(l) => shift!(*l, count, operator, Value::Int64, i64),
        Value::Uint(l) => shift!(*l, count, operator, Value::Uint, u64),
        Value::Uint8(l) => shift!(*l, count, operator, Value::Uint8, u8),
        Value::Uint16(l) => shift!(*l, count, operator, Value::Uint16, u16),
        Value::Uint32(l) => shift!(*l, count, operator, Value::Uint32, u32),
        Value::Uint64(l) => shift!(*l, count, operator, Value::Uint64, u64),
        Value::Uintptr(l) => shift!(*l, count, operator, Value::Uintptr, u64),
        _ => return Err(unsupported(operator, left)),
    })
}

/// Applies a binary operator to two evaluated operands.
pub fn binary_op(left: &Value, operator: TokenKind, right: &Value) -> Result<Value, ErrorImpl> {
    match operator {
        TokenKind::Equals => return values_equal(left, right).map(Value::Bool),
        TokenKind::NotEquals => return values_equal(left, right).map(|equal| Value::Bool(!equal)),
        TokenKind::ShiftLeft | TokenKind::ShiftRight => return shift_op(left, operator, right),
        _ => {}
    }

    if left.type_of() != right.type_of() {
        return Err(mismatch(left, right));
    }

    let result = match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => match operator {
            TokenKind::And => Ok(Value::Bool(*l && *r)),
            TokenKind::Or => Ok(Value::Bool(*l || *r)),
            _ => Err(None),
        },
        (Value::Int(l), Value::Int(r)) => integer_op!(*l, *r, operator, Value::Int),
        (Value::Int8(l), Value::Int8(r)) => integer_op!(*l, *r, operator, Value::Int8),
        (Value::Int16(l), Value::Int16(r)) => integer_op!(*l, *r, operator, Value::Int16),
        (Value::Int32(l), Value::Int32(r)) => integer_op!(*l, *r, operator, Value::Int32),
        (Value::Int64(l), Value::Int64(r)) => integer_op!(*l, *r, operator, Value::Int64),
        (Value::Uint(l), Value::Uint(r)) => integer_op!(*l, *r, operator, Value::Uint),
        (Value::Uint8(l), Value::Uint8(r)) => integer_op!(*l, *r, operator, Value::Uint8),
        (Value::Uint16(l), Value::Uint16(r)) => integer_op!(*l, *r, operator, Value::Uint16),
        (Value::Uint32(l), Value::Uint32(r)) => integer_op!(*l, *r, operator, Value::Uint32),
        (Value::Uint64(l), Value::Uint64(r)) => integer_op!(*l, *r, operator, Value::Uint64),
        (Value::Uintptr(l), Value::Uintptr(r)) => integer_op!(*l, *r, operator, Value::Uintptr),
        (Value::Float32(l), Value::Float32(r)) => float_op!(*l, *r, operator, Value::Float32),
        (Value::Float64(l), Value::Float64(r)) => float_op!(*l, *r, operator, Value::Float64),
        (Value::Complex64(a, b), Value::Complex64(c, d)) => {
            complex_op!((*a, *b), (*c, *d), operator, Value::Complex64).ok_or(None)
        }
        (Value::Complex128(a, b), Value::Complex128(c, d)) => {
            complex_op!((*a, *b), (*c, *d), operator, Value::Complex128).ok_or(None)
        }
        (Value::String(l), Value::String(r)) => match operator {
            TokenKind::Plus => Ok(Value::String(format!("{}{}", l, r))),
            op => compare!(l, r, op).ok_or(None),
        },
        _ => Err(None),
    };

    // `None` marks an operator the operand kind does not define
    result.map_err(|error| error.unwrap_or_else(|| unsupported(operator, left)))
}

/// Applies a prefix operator to an evaluated operand.
pub fn unary_op(operator: TokenKind, operand: &Value) -> Result<Value, ErrorImpl> {
    let result = match (operator, operand) {
        (TokenKind::Plus, value) if value.type_of().is_numeric() => Some(value.clone()),
        (TokenKind::Not, Value::Bool(v)) => Some(Value::Bool(!v)),
        (TokenKind::Dash, Value::Int(v)) => Some(Value::Int(v.wrapping_neg())),
        (TokenKind::Dash, Value::Int8(v)) => Some(Value::Int8(v.wrapping_neg())),
        (TokenKind::Dash, Value::Int16(v)) => Some(Value::Int16(v.wrapping_neg())),
        (TokenKind::Dash, Value::Int32(v)) => Some(Value::Int32(v.wrapping_neg())),
        (TokenKind::Dash, Value::Int64(v)) => Some(Value::Int64(v.wrapping_neg())),
        (TokenKind::Dash, Value::Uint(v)) => Some(Value::Uint(v.wrapping_neg())),
        (TokenKind::Dash, Value::Uint8(v)) => Some(Value::Uint8(v.wrapping_neg())),
        (TokenKind::Dash, Value::Uint16(v)) => Some(Value::Uint16(v.wrapping_neg())),
        (TokenKind::Dash, Value::Uint32(v)) => Some(Value::Uint32(v.wrapping_neg())),
        (TokenKind::Dash, Value::Uint64(v)) => Some(Value::Uint64(v.wrapping_neg())),
        (TokenKind::Dash, Value::Uintptr(v)) => Some(Value::Uintptr(v.wrapping_neg())),
        (TokenKind::Dash, Value::Float32(v)) => Some(Value::Float32(-v)),
        (TokenKind::Dash, Value::Float64(v)) => Some(Value::Float64(-v)),
        (TokenKind::Dash, Value::Complex64(re, im)) => Some(Value::Complex64(-re, -im)),
        (TokenKind::Dash, Value::Complex128(re, im)) => Some(Value::Complex128(-re, -im)),
        (TokenKind::Caret, Value::Int(v)) => Some(Value::Int(!v)),
        (TokenKind::Caret, Value::Int8(v)) => Some(Value::Int8(!v)),
        (TokenKind::Caret, Value::Int16(v)) => Some(Value::Int16(!v)),
        (TokenKind::Caret, Value::Int32(v)) => Some(Value::Int32(!v)),
        (TokenKind::Caret, Value::Int64(v)) => Some(Value::Int64(!v)),
        (TokenKind::Caret, Value::Uint(v)) => Some(Value::Uint(!v)),
        (TokenKind::Caret, Value::Uint8(v)) => Some(Value::Uint8(!v)),
        (TokenKind::Caret, Value::Uint16(v)) => Some(Value::Uint16(!v)),
        (TokenKind::Caret, Value::Uint32(v)) => Some(Value::Uint32(!v)),
        (TokenKind::Caret, Value::Uint64(v)) => Some(Value::Uint64(!v)),
        (TokenKind::Caret, Value::Uintptr(v)) => Some(Value::Uintptr(!v)),
        _ => None,
    };

    result.ok_or_else(|| unsupported(operator, operand))
}
