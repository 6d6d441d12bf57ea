//! Lexical scope chain
//!
//! This module provides the environments closures capture:
//! - [`Scope`]: one block or function activation with its bindings
//! - [`Binding`]: a named value with its declaration kind and initialization state
//! - [`ScopeRef`]: shared handle, so a closure keeps its defining scope alive
//!
//! # Initialization Tracking
//!
//! `let` and `const` bindings are created uninitialized when their block is
//! entered and become readable only once their declaration executes (the
//! temporal dead zone). `var` and function bindings are readable immediately.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::value::Value;
use crate::parser::ast::DeclKind;

pub type ScopeRef = Rc<RefCell<Scope>>;

/// How a binding was introduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Let,
    Const,
    Var,
    Function,
    Param,
}

impl From<DeclKind> for BindingKind {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Let => BindingKind::Let,
            DeclKind::Const => BindingKind::Const,
            DeclKind::Var => BindingKind::Var,
        }
    }
}

/// A variable slot in a scope
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub kind: BindingKind,
    pub initialized: bool,
}

impl Binding {
    pub fn new(kind: BindingKind, value: Value) -> Self {
        Binding {
            value,
            kind,
            initialized: true,
        }
    }

    /// A `let`/`const` slot that cannot be read until its declaration runs
    pub fn uninitialized(kind: BindingKind) -> Self {
        Binding {
            value: Value::Undefined,
            kind,
            initialized: false,
        }
    }
}

/// Why a lookup or assignment failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    NotDefined,
    Uninitialized,
    ConstAssignment,
    AlreadyDeclared,
}

/// One lexical environment record
#[derive(Debug, Default)]
pub struct Scope {
    vars: FxHashMap<String, Binding>,
    parent: Option<ScopeRef>,
    is_function: bool,
}

impl Scope {
    /// Create the global scope
    pub fn global() -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            vars: FxHashMap::default(),
            parent: None,
            is_function: true,
        }))
    }

    /// Create a child scope; function scopes receive hoisted `var` bindings
    pub fn child(parent: &ScopeRef, is_function: bool) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            vars: FxHashMap::default(),
            parent: Some(Rc::clone(parent)),
            is_function,
        }))
    }

    pub fn parent(&self) -> Option<ScopeRef> {
        self.parent.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Declare a binding in this scope.
    ///
    /// `var` and function bindings may be redeclared; lexical bindings may not.
    pub fn declare(&mut self, name: &str, binding: Binding) -> Result<(), ScopeError> {
        if let Some(existing) = self.vars.get_mut(name) {
            let lexical = |k: BindingKind| matches!(k, BindingKind::Let | BindingKind::Const);
            if lexical(existing.kind) || lexical(binding.kind) {
                return Err(ScopeError::AlreadyDeclared);
            }
            // Redeclaring with `var` keeps the current value
            if binding.kind == BindingKind::Var {
                return Ok(());
            }
            *existing = binding;
            return Ok(());
        }
        self.vars.insert(name.to_string(), binding);
        Ok(())
    }

    /// Initialize a hoisted binding when its declaration executes
    pub fn initialize(&mut self, name: &str, value: Value) {
        match self.vars.get_mut(name) {
            Some(binding) => {
                binding.value = value;
                binding.initialized = true;
            }
            None => {
                self.vars
                    .insert(name.to_string(), Binding::new(BindingKind::Let, value));
            }
        }
    }

    /// Remove every binding; used to break reference cycles on teardown
    pub fn clear(&mut self) {
        self.vars.clear();
        self.parent = None;
    }

    /// Copy of the bindings, used to give each `for (let ...)` iteration its own scope
    pub fn bindings(&self) -> Vec<(String, Binding)> {
        self.vars
            .iter()
            .map(|(name, binding)| (name.clone(), binding.clone()))
            .collect()
    }
}

/// Walk the chain looking up `name`
pub fn lookup(scope: &ScopeRef, name: &str) -> Result<Value, ScopeError> {
    let mut current = Rc::clone(scope);
    loop {
        let next = {
            let s = current.borrow();
            if let Some(binding) = s.vars.get(name) {
                if !binding.initialized {
                    return Err(ScopeError::Uninitialized);
                }
                return Ok(binding.value.clone());
            }
            s.parent.clone()
        };
        match next {
            Some(parent) => current = parent,
            None => return Err(ScopeError::NotDefined),
        }
    }
}

/// Walk the chain assigning to an existing binding
pub fn assign(scope: &ScopeRef, name: &str, value: Value) -> Result<(), ScopeError> {
    let mut current = Rc::clone(scope);
    loop {
        let next = {
            let mut s = current.borrow_mut();
            if let Some(binding) = s.vars.get_mut(name) {
                if !binding.initialized {
                    return Err(ScopeError::Uninitialized);
                }
                if binding.kind == BindingKind::Const {
                    return Err(ScopeError::ConstAssignment);
                }
                binding.value = value;
                return Ok(());
            }
            s.parent.clone()
        };
        match next {
            Some(parent) => current = parent,
            None => return Err(ScopeError::NotDefined),
        }
    }
}

/// Nearest enclosing function (or global) scope, where `var` declarations live
pub fn function_scope(scope: &ScopeRef) -> ScopeRef {
    let mut current = Rc::clone(scope);
    loop {
        let next = {
            let s = current.borrow();
            if s.is_function {
                None
            } else {
                s.parent.clone()
            }
        };
        match next {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_parents() {
        let global = Scope::global();
        global
            .borrow_mut()
            .declare("x", Binding::new(BindingKind::Let, Value::Number(1.0)))
            .unwrap();
        let inner = Scope::child(&global, false);

        assert!(matches!(lookup(&inner, "x"), Ok(Value::Number(n)) if n == 1.0));
        assert_eq!(lookup(&inner, "y").unwrap_err(), ScopeError::NotDefined);
    }

    #[test]
    fn test_shadowing_and_assignment() {
        let global = Scope::global();
        global
            .borrow_mut()
            .declare("x", Binding::new(BindingKind::Let, Value::Number(1.0)))
            .unwrap();
        let inner = Scope::child(&global, false);
        inner
            .borrow_mut()
            .declare("x", Binding::new(BindingKind::Let, Value::Number(2.0)))
            .unwrap();

        assign(&inner, "x", Value::Number(3.0)).unwrap();
        assert!(matches!(lookup(&global, "x"), Ok(Value::Number(n)) if n == 1.0));
        assert!(matches!(lookup(&inner, "x"), Ok(Value::Number(n)) if n == 3.0));
    }

    #[test]
    fn test_const_and_tdz() {
        let global = Scope::global();
        global
            .borrow_mut()
            .declare("c", Binding::uninitialized(BindingKind::Const))
            .unwrap();
        assert_eq!(lookup(&global, "c").unwrap_err(), ScopeError::Uninitialized);

        global.borrow_mut().initialize("c", Value::Number(5.0));
        assert_eq!(
            assign(&global, "c", Value::Null).unwrap_err(),
            ScopeError::ConstAssignment
        );
    }

    #[test]
    fn test_redeclaration_rules() {
        let global = Scope::global();
        let mut scope = global.borrow_mut();
        scope
            .declare("v", Binding::new(BindingKind::Var, Value::Number(1.0)))
            .unwrap();
        scope
            .declare("v", Binding::new(BindingKind::Var, Value::Undefined))
            .unwrap();
        assert!(matches!(scope.vars.get("v").map(|b| &b.value), Some(Value::Number(n)) if *n == 1.0));

        scope
            .declare("l", Binding::uninitialized(BindingKind::Let))
            .unwrap();
        assert_eq!(
            scope.declare("l", Binding::uninitialized(BindingKind::Let)),
            Err(ScopeError::AlreadyDeclared)
        );
    }

    #[test]
    fn test_function_scope_skips_blocks() {
        let global = Scope::global();
        let func = Scope::child(&global, true);
        let block = Scope::child(&func, false);
        assert!(Rc::ptr_eq(&function_scope(&block), &func));
        assert!(Rc::ptr_eq(&function_scope(&global), &global));
    }
}
