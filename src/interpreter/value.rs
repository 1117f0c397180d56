//! Runtime values and the bridge to host-supplied structs, functions and
//! packages.

use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    fmt::{self, Display},
    rc::Rc,
};

use crate::{ast::expressions::FuncLitExpr, errors::errors::ErrorImpl};

use super::{scope::Scope, types::Type};

/// A live value.
///
/// Integer and float widths are part of a value's identity: an `Int32` and an
/// `Int64` never mix without an explicit conversion.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint(u64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Uintptr(u64),
    Float32(f32),
    Float64(f64),
    Complex64(f32, f32),
    Complex128(f64, f64),
    String(String),
    /// A non-nil host error; holds its message.
    Error(String),
    Slice(SliceValue),
    Map(MapValue),
    Chan(ChanValue),
    Struct(Rc<dyn StructValue>),
    Function(Function),
    Type(Type),
    Package(Package),
}

impl Value {
    pub fn type_of(&self) -> Type {
        match self {
            Value::Nil => Type::Nil,
            Value::Bool(_) => Type::Bool,
            Value::Int(_) => Type::Int,
            Value::Int8(_) => Type::Int8,
            Value::Int16(_) => Type::Int16,
            Value::Int32(_) => Type::Int32,
            Value::Int64(_) => Type::Int64,
            Value::Uint(_) => Type::Uint,
            Value::Uint8(_) => Type::Uint8,
            Value::Uint16(_) => Type::Uint16,
            Value::Uint32(_) => Type::Uint32,
            Value::Uint64(_) => Type::Uint64,
            Value::Uintptr(_) => Type::Uintptr,
            Value::Float32(_) => Type::Float32,
            Value::Float64(_) => Type::Float64,
            Value::Complex64(_, _) => Type::Complex64,
            Value::Complex128(_, _) => Type::Complex128,
            Value::String(_) => Type::String,
            Value::Error(_) => Type::Error,
            Value::Slice(slice) => Type::Slice(Box::new(slice.elem.clone())),
            Value::Map(map) => Type::Map(Box::new(map.key.clone()), Box::new(map.value.clone())),
            Value::Chan(chan) => Type::Chan(Box::new(chan.elem.clone())),
            Value::Struct(instance) => Type::Struct(instance.type_name()),
            Value::Function(_) => Type::Func,
            Value::Type(_) => Type::Type,
            Value::Package(_) => Type::Package,
        }
    }

    /// The value of any integer kind, widened so every kind fits.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Int(v) | Value::Int64(v) => Some(*v as i128),
            Value::Int8(v) => Some(*v as i128),
            Value::Int16(v) => Some(*v as i128),
            Value::Int32(v) => Some(*v as i128),
            Value::Uint(v) | Value::Uint64(v) | Value::Uintptr(v) => Some(*v as i128),
            Value::Uint8(v) => Some(*v as i128),
            Value::Uint16(v) => Some(*v as i128),
            Value::Uint32(v) => Some(*v as i128),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Int(l), Value::Int(r)) | (Value::Int64(l), Value::Int64(r)) => l == r,
            (Value::Int8(l), Value::Int8(r)) => l == r,
            (Value::Int16(l), Value::Int16(r)) => l == r,
            (Value::Int32(l), Value::Int32(r)) => l == r,
            (Value::Uint(l), Value::Uint(r))
            | (Value::Uint64(l), Value::Uint64(r))
            | (Value::Uintptr(l), Value::Uintptr(r)) => l == r,
            (Value::Uint8(l), Value::Uint8(r)) => l == r,
            (Value::Uint16(l), Value::Uint16(r)) => l == r,
            (Value::Uint32(l), Value::Uint32(r)) => l == r,
            (Value::Float32(l), Value::Float32(r)) => l == r,
            (Value::Float64(l), Value::Float64(r)) => l == r,
            (Value::Complex64(lr, li), Value::Complex64(rr, ri)) => lr == rr && li == ri,
            (Value::Complex128(lr, li), Value::Complex128(rr, ri)) => lr == rr && li == ri,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Error(l), Value::Error(r)) => l == r,
            (Value::Slice(l), Value::Slice(r)) => l.elem == r.elem && l.to_vec() == r.to_vec(),
            (Value::Map(l), Value::Map(r)) => {
                l.key == r.key
                    && l.value == r.value
                    && l.len() == r.len()
                    && l.entries().iter().all(|(key, value)| r.get(key).as_ref() == Some(value))
            }
            (Value::Chan(l), Value::Chan(r)) => Rc::ptr_eq(&l.buffer, &r.buffer),
            (Value::Struct(l), Value::Struct(r)) => std::ptr::addr_eq(Rc::as_ptr(l), Rc::as_ptr(r)),
            (Value::Function(l), Value::Function(r)) => l == r,
            (Value::Type(l), Value::Type(r)) => l == r,
            (Value::Package(l), Value::Package(r)) => l.name == r.name,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "<nil>"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) | Value::Int64(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Uint(v) | Value::Uint64(v) | Value::Uintptr(v) => write!(f, "{}", v),
            Value::Uint8(v) => write!(f, "{}", v),
            Value::Uint16(v) => write!(f, "{}", v),
            Value::Uint32(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Complex64(re, im) => write!(f, "({}{:+}i)", re, im),
            Value::Complex128(re, im) => write!(f, "({}{:+}i)", re, im),
            Value::String(v) | Value::Error(v) => write!(f, "{}", v),
            Value::Slice(slice) => {
                let items: Vec<String> = slice.to_vec().iter().map(Value::to_string).collect();
                write!(f, "[{}]", items.join(" "))
            }
            Value::Map(map) => {
                let entries: Vec<String> = map
                    .entries()
                    .iter()
                    .map(|(key, value)| format!("{}:{}", key, value))
                    .collect();
                write!(f, "map[{}]", entries.join(" "))
            }
            Value::Chan(chan) => write!(f, "chan {} (cap {})", chan.elem, chan.capacity),
            Value::Struct(instance) => write!(f, "{{{}}}", instance.type_name()),
            Value::Function(function) => write!(f, "func {}", function.name()),
            Value::Type(ty) => write!(f, "{}", ty),
            Value::Package(package) => write!(f, "package {}", package.name),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<Package> for Value {
    fn from(value: Package) -> Self {
        Value::Package(value)
    }
}

/// A growable sequence. Clones share the backing store.
#[derive(Debug, Clone)]
pub struct SliceValue {
    pub elem: Type,
    items: Rc<RefCell<Vec<Value>>>,
}

impl SliceValue {
    pub fn new(elem: Type, items: Vec<Value>) -> Self {
        SliceValue {
            elem,
            items: Rc::new(RefCell::new(items)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    /// Stores `value` at `index`; visible through every clone.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.items.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

/// A hash-less mapping keyed by value equality. Clones share the backing store.
#[derive(Debug, Clone)]
pub struct MapValue {
    pub key: Type,
    pub value: Type,
    entries: Rc<RefCell<Vec<(Value, Value)>>>,
}

impl MapValue {
    pub fn new(key: Type, value: Type) -> Self {
        MapValue {
            key,
            value,
            entries: Rc::new(RefCell::new(vec![])),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries
            .borrow()
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.clone())
    }

    /// Inserts or replaces the entry for `key`.
    pub fn insert(&self, key: Value, value: Value) {
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
    }

    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.borrow().clone()
    }
}

/// A buffered channel. Channels are always bidirectional; clones share the
/// buffer and compare equal.
#[derive(Debug, Clone)]
pub struct ChanValue {
    pub elem: Type,
    pub capacity: usize,
    buffer: Rc<RefCell<VecDeque<Value>>>,
}

impl ChanValue {
    pub fn new(elem: Type, capacity: usize) -> Self {
        ChanValue {
            elem,
            capacity,
            buffer: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Number of buffered values.
    pub fn len(&self) -> usize {
        self.buffer.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A host struct, introspectable by field and method name only.
pub trait StructValue: fmt::Debug {
    fn type_name(&self) -> String;
    fn field(&self, name: &str) -> Option<Value>;
    fn method(&self, name: &str) -> Option<Function>;
}

pub type NativeFn = dyn Fn(Vec<Value>) -> Result<Vec<Value>, ErrorImpl>;

/// A host callable. It returns every result of the call; the evaluator
/// decides what a given result count means.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    func: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>, ErrorImpl> + 'static,
    {
        NativeFunction {
            name: name.to_string(),
            func: Rc::new(func),
        }
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Vec<Value>, ErrorImpl> {
        (self.func)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A function literal together with the scope it was written in.
#[derive(Clone)]
pub struct Closure {
    pub literal: Rc<FuncLitExpr>,
    pub scope: Scope,
}

// The captured scope may hold this closure, so it is left out
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters: Vec<&str> = self
            .literal
            .parameters
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        f.debug_struct("Closure")
            .field("parameters", &parameters)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Function {
    Native(NativeFunction),
    Closure(Closure),
}

impl Function {
    pub fn native<F>(name: &str, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>, ErrorImpl> + 'static,
    {
        Function::Native(NativeFunction::new(name, func))
    }

    pub fn name(&self) -> &str {
        match self {
            Function::Native(native) => &native.name,
            Function::Closure(_) => "literal",
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Native(l), Function::Native(r)) => {
                std::ptr::addr_eq(Rc::as_ptr(&l.func), Rc::as_ptr(&r.func))
            }
            (Function::Closure(l), Function::Closure(r)) => {
                Rc::ptr_eq(&l.literal, &r.literal) && l.scope.ptr_eq(&r.scope)
            }
            _ => false,
        }
    }
}

/// A host namespace of callables, reached with `name.Member`.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub functions: HashMap<String, Function>,
}

impl Package {
    pub fn new(name: &str) -> Self {
        Package {
            name: name.to_string(),
            functions: HashMap::new(),
        }
    }

    pub fn with_function(mut self, name: &str, function: Function) -> Self {
        self.functions.insert(name.to_string(), function);
        self
    }
}
