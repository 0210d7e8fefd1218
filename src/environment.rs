//! Lexical scope chain: each `Environment` maps names to values and holds an
//! optional link to exactly one parent scope. A name may be declared at most
//! once per scope; shadowing in a child scope is allowed. The chain is read
//! and written only on the evaluating thread.
//!
//! Scope operations report failures as plain `String` messages; the evaluator
//! attaches the offending node's source location when wrapping them into the
//! crate error type.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};

use crate::builtins;
use crate::value::Value;

/// Shared handle to a scope node. Children own a counted reference to their
/// parent; parents do not know their children.
pub type ScopeRef = Rc<RefCell<Environment>>;

#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    parent: Option<ScopeRef>,
}

impl Environment {
    /// An empty root scope with no bindings.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            parent: None,
        }
    }

    /// A child scope chained to `parent`. Nesting depth is unbounded.
    pub fn with_parent(parent: ScopeRef) -> Self {
        Environment {
            values: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// The global environment: a root scope seeded with the built-in
    /// constants (`null`, `true`, `false`) and the native bindings
    /// (`print`, `printf`, the `math` namespace).
    pub fn global() -> ScopeRef {
        info!("Creating global environment");

        let scope: ScopeRef = Rc::new(RefCell::new(Environment::new()));
        builtins::install(&scope);

        scope
    }

    /// Bind `name` in *this* scope. Fails when the name is already declared
    /// here (ancestor scopes do not conflict). When `readonly` is requested
    /// and the value's own flag is unset, the flag is imposed before storing.
    pub fn declare(&mut self, name: &str, mut value: Value, readonly: bool) -> Result<Value, String> {
        if self.values.contains_key(name) {
            return Err(format!("Cannot redeclare variable '{}'", name));
        }

        if readonly && !value.readonly {
            value.readonly = true;
        }

        debug!("Declaring '{}' (readonly: {})", name, value.readonly);

        self.values.insert(name.to_string(), value.clone());

        Ok(value)
    }

    /// Return the current value of `name`, walking the scope chain from the
    /// innermost scope outward.
    pub fn lookup(&self, name: &str) -> Result<Value, String> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().lookup(name)
        } else {
            Err(format!("Undefined variable '{}'", name))
        }
    }

    /// Overwrite the binding of `name` in its owning scope. Assignment
    /// replaces the stored value wholesale; it never merges into Object
    /// contents. Fails when the existing binding is readonly or when no
    /// scope in the chain declares the name.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<Value, String> {
        if let Some(existing) = self.values.get(name) {
            if existing.readonly {
                return Err(format!("Cannot assign to constant '{}'", name));
            }

            debug!("Assigning '{}'", name);

            self.values.insert(name.to_string(), value.clone());

            Ok(value)
        } else if let Some(parent) = &self.parent {
            parent.borrow_mut().assign(name, value)
        } else {
            Err(format!("Undefined variable '{}'", name))
        }
    }

    /// Is `name` declared in this scope itself (not an ancestor)?
    pub fn declares_locally(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn parent(&self) -> Option<ScopeRef> {
        self.parent.clone()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// The scope that owns `name`, walking from `scope` to the root.
pub fn resolve(scope: &ScopeRef, name: &str) -> Result<ScopeRef, String> {
    if scope.borrow().declares_locally(name) {
        return Ok(Rc::clone(scope));
    }

    let parent: Option<ScopeRef> = scope.borrow().parent();

    match parent {
        Some(parent) => resolve(&parent, name),
        None => Err(format!("Undefined variable '{}'", name)),
    }
}
