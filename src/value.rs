//! Runtime value model: a closed set of tagged variants, each carrying a
//! `readonly` flag. The flag is set at construction and enforced only when a
//! binding is reassigned — an Object's contents stay mutable in place even
//! when the value itself is readonly.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::environment::ScopeRef;
use crate::error::Result;

/// Calling convention for host-provided functions: the *calling* scope plus
/// the already-evaluated arguments.
pub type NativeFn = fn(&ScopeRef, &[Value]) -> Result<Value>;

/// A host-provided callable registered in the global scope.
#[derive(Debug)]
pub struct NativeFunction {
    pub name: String,
    pub func: NativeFn,
}

/// The tag of a runtime value.
#[derive(Debug, Clone)]
pub enum ValueKind {
    Null,

    /// Both integer and decimal literals collapse into one numeric type.
    Number(f64),

    Bool(bool),

    Str(String),

    /// A unique token; two symbols are equal only if they are the same
    /// allocation, never by description.
    Symbol(Rc<str>),

    /// String-keyed mapping. Insertion order is preserved for display but
    /// carries no semantics.
    Object(Rc<RefCell<IndexMap<String, Value>>>),

    Native(Rc<NativeFunction>),
}

/// A tagged runtime datum produced by evaluation.
#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    pub readonly: bool,
}

impl Value {
    fn of(kind: ValueKind) -> Self {
        Self {
            kind,
            readonly: false,
        }
    }

    pub fn null() -> Self {
        Self::of(ValueKind::Null)
    }

    pub fn number(n: f64) -> Self {
        Self::of(ValueKind::Number(n))
    }

    pub fn bool(b: bool) -> Self {
        Self::of(ValueKind::Bool(b))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::of(ValueKind::Str(s.into()))
    }

    pub fn symbol(description: impl AsRef<str>) -> Self {
        Self::of(ValueKind::Symbol(Rc::from(description.as_ref())))
    }

    pub fn object(entries: IndexMap<String, Value>) -> Self {
        Self::of(ValueKind::Object(Rc::new(RefCell::new(entries))))
    }

    pub fn native(name: impl Into<String>, func: NativeFn) -> Self {
        Self::of(ValueKind::Native(Rc::new(NativeFunction {
            name: name.into(),
            func,
        })))
    }

    /// Mark this value readonly (builder-style).
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn as_number(&self) -> Option<f64> {
        if let ValueKind::Number(n) = self.kind {
            Some(n)
        } else {
            None
        }
    }

    /// A short tag name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Null => "null",
            ValueKind::Number(_) => "number",
            ValueKind::Bool(_) => "boolean",
            ValueKind::Str(_) => "string",
            ValueKind::Symbol(_) => "symbol",
            ValueKind::Object(_) => "object",
            ValueKind::Native(_) => "native function",
        }
    }
}

/// Equality compares the tagged contents only; the readonly flag is a
/// property of a binding, not of the value's identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl PartialEq for ValueKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Number(a), ValueKind::Number(b)) => a == b,
            (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
            (ValueKind::Str(a), ValueKind::Str(b)) => a == b,
            (ValueKind::Symbol(a), ValueKind::Symbol(b)) => Rc::ptr_eq(a, b),
            (ValueKind::Object(a), ValueKind::Object(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (ValueKind::Native(a), ValueKind::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::Null => write!(f, "[null]"),

            ValueKind::Bool(b) => write!(f, "{}", b),

            ValueKind::Number(n) => {
                // 3 → "3", 3.14 → "3.14"; non-finite values print as-is.
                // The itoa fast path only holds below 2^63, where the i64
                // cast is exact; larger integrals go through the float
                // formatter, which never uses exponent notation.
                if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
                    let mut buf: itoa::Buffer = itoa::Buffer::new();
                    write!(f, "{}", buf.format(*n as i64))
                } else {
                    write!(f, "{}", n)
                }
            }

            ValueKind::Str(s) => write!(f, "{}", s),

            ValueKind::Symbol(description) => write!(f, "[symbol {}]", description),

            ValueKind::Object(entries) => {
                let entries = entries.borrow();

                if entries.is_empty() {
                    return write!(f, "{{}}");
                }

                write!(f, "{{ ")?;

                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{}: {}", key, value)?;
                }

                write!(f, " }}")
            }

            ValueKind::Native(native) => {
                write!(f, "func {}() {{ [native code] }}", native.name)
            }
        }
    }
}
