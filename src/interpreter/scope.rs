//! Nested name to value bindings.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::{builtins, value::Value};

#[derive(Debug, Default)]
pub struct Environment {
    pub variable_lookup: HashMap<String, Value>,
    parent: Option<Scope>,
    /// Set on the parentless scope holding `nil`, `true`, `append`, ...
    builtin: bool,
    /// Closure calls active when this scope was created
    call_depth: usize,
}

/// A handle to one level of the scope chain. Clones refer to the same level.
#[derive(Debug, Clone, Default)]
pub struct Scope(Rc<RefCell<Environment>>);

impl Scope {
    /// An empty scope with no parent.
    pub fn new() -> Self {
        Scope::default()
    }

    pub fn with_parent(parent: &Scope) -> Self {
        Scope(Rc::new(RefCell::new(Environment {
            parent: Some(parent.clone()),
            call_depth: parent.call_depth(),
            ..Environment::default()
        })))
    }

    /// The scope of one closure call: a child of the closure's captured
    /// scope, `call_depth` calls deep.
    pub fn for_call(captured: &Scope, call_depth: usize) -> Self {
        Scope(Rc::new(RefCell::new(Environment {
            parent: Some(captured.clone()),
            call_depth,
            ..Environment::default()
        })))
    }

    pub fn call_depth(&self) -> usize {
        self.0.borrow().call_depth
    }

    /// The parentless scope holding the builtin bindings.
    pub fn builtins() -> Self {
        let variable_lookup = builtins::BUILTIN_NAMES
            .iter()
            .filter_map(|name| builtins::builtin_value(name).map(|value| (name.to_string(), value)))
            .collect();

        Scope(Rc::new(RefCell::new(Environment {
            variable_lookup,
            parent: None,
            builtin: true,
            call_depth: 0,
        })))
    }

    /// A fresh session scope whose root ancestor is the builtin scope.
    pub fn with_builtins() -> Self {
        Scope::with_parent(&Scope::builtins())
    }

    pub fn parent(&self) -> Option<Scope> {
        self.0.borrow().parent.clone()
    }

    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Walks from this scope to the root and returns the first binding.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            if let Some(value) = scope.0.borrow().variable_lookup.get(name) {
                return Some(value.clone());
            }
            current = scope.parent();
        }
        None
    }

    /// Like `get`, but ignores the builtin scope.
    pub fn get_declared(&self, name: &str) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            let environment = scope.0.borrow();
            if !environment.builtin {
                if let Some(value) = environment.variable_lookup.get(name) {
                    return Some(value.clone());
                }
            }
            current = environment.parent.clone();
        }
        None
    }

    /// Overwrites the nearest existing binding of `name`, or binds it in
    /// this scope when no level has it.
    pub fn set(&self, name: &str, value: Value) {
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            let mut environment = scope.0.borrow_mut();
            if let Some(slot) = environment.variable_lookup.get_mut(name) {
                *slot = value;
                return;
            }
            current = environment.parent.clone();
        }

        self.declare(name, value);
    }

    /// Binds `name` in this scope's own mapping, shadowing any ancestor.
    pub fn declare(&self, name: &str, value: Value) {
        self.0
            .borrow_mut()
            .variable_lookup
            .insert(name.to_string(), value);
    }

    /// Every name visible from this scope, innermost level first. A
    /// shadowed name is listed once per level that binds it.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = vec![];
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            let mut level: Vec<String> = scope.0.borrow().variable_lookup.keys().cloned().collect();
            level.sort();
            keys.extend(level);
            current = scope.parent();
        }
        keys
    }
}
