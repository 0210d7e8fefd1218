//! Tree-walking evaluator. Dispatches purely on node kind, threads a scope
//! handle through every call, and returns a runtime value or a structured
//! `Exception` carrying the offending node's source location.
//!
//! Two permissive behaviors of the language are preserved deliberately:
//!
//! - a binary expression whose operands are not both numbers yields null
//!   silently, with no type error;
//! - `/` and `%` carry no divide-by-zero guard, so `1 / 0` is Infinity and
//!   `0 / 0` is NaN per IEEE-754.

use indexmap::IndexMap;
use log::{debug, info};

use crate::ast::{Expr, Program, Property, Stmt};
use crate::environment::{Environment, ScopeRef};
use crate::error::{CalyxError, Result};
use crate::value::{Value, ValueKind};

/// The operators a numeric binary expression understands. Anything else is
/// an evaluator error.
const BINARY_OPERATORS: [&str; 6] = ["+", "-", "*", "/", "%", "**"];

pub struct Interpreter {
    globals: ScopeRef,
}

impl Interpreter {
    /// Create an interpreter with a freshly seeded global environment.
    pub fn new() -> Self {
        info!("Initializing interpreter");

        Self {
            globals: Environment::global(),
        }
    }

    /// The global scope this interpreter evaluates against. Useful for hosts
    /// that register additional native bindings or inspect results.
    pub fn globals(&self) -> &ScopeRef {
        &self.globals
    }

    /// Evaluate a whole program against the global scope. The program's
    /// value is its last statement's value, or null for an empty body.
    pub fn run(&self, program: &Program) -> Result<Value> {
        self.evaluate_program(program, &self.globals)
    }

    /// Evaluate a program against an explicit scope.
    pub fn evaluate_program(&self, program: &Program, env: &ScopeRef) -> Result<Value> {
        debug!("Evaluating {} statements", program.statements.len());

        let mut last: Value = Value::null();

        for stmt in &program.statements {
            debug!("Executing statement at {}", stmt.location());

            last = self.execute(stmt, env)?;
        }

        Ok(last)
    }

    /// Execute a single statement; declarations mutate `env` as a side
    /// effect and yield the declared value.
    pub fn execute(&self, stmt: &Stmt, env: &ScopeRef) -> Result<Value> {
        match stmt {
            Stmt::Expr(expr) => self.evaluate(expr, env),

            Stmt::VarDecl {
                constant,
                name,
                initializer,
                location,
            } => {
                debug!("Declaring variable '{}' (constant: {})", name, constant);

                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr, env)?,
                    None => Value::null(),
                };

                env.borrow_mut()
                    .declare(name, value, *constant)
                    .map_err(|msg| CalyxError::exception(msg, location.clone()))
            }
        }
    }

    /// Evaluate a single expression node.
    pub fn evaluate(&self, expr: &Expr, env: &ScopeRef) -> Result<Value> {
        match expr {
            Expr::Integer { value, .. } | Expr::Decimal { value, .. } => Ok(Value::number(*value)),

            Expr::Null { .. } => Ok(Value::null()),

            Expr::Identifier { name, location } => env
                .borrow()
                .lookup(name)
                .map_err(|msg| CalyxError::exception(msg, location.clone())),

            Expr::Binary {
                operator,
                left,
                right,
                location,
            } => {
                // Eager, left before right.
                let lhs: Value = self.evaluate(left, env)?;
                let rhs: Value = self.evaluate(right, env)?;

                if !BINARY_OPERATORS.contains(&operator.as_str()) {
                    return Err(CalyxError::exception(
                        format!("Unsupported binary operator '{}'", operator),
                        location.clone(),
                    ));
                }

                match (lhs.as_number(), rhs.as_number()) {
                    (Some(a), Some(b)) => Ok(apply_numeric(operator, a, b)),

                    // Mixed operand types collapse to null, silently.
                    _ => Ok(Value::null()),
                }
            }

            Expr::Assign {
                target,
                value,
                location,
            } => match target.as_ref() {
                Expr::Identifier { name, .. } => {
                    let value: Value = self.evaluate(value, env)?;

                    env.borrow_mut()
                        .assign(name, value)
                        .map_err(|msg| CalyxError::exception(msg, location.clone()))
                }

                // Reported at the offending target, not at the '='.
                other => Err(CalyxError::exception(
                    format!(
                        "Invalid assignment target: expected an identifier, found {} expression",
                        kind_name(other)
                    ),
                    other.location().clone(),
                )),
            },

            Expr::Object { properties, .. } => {
                let mut entries: IndexMap<String, Value> = IndexMap::new();

                for property in properties {
                    let value: Value = self.property_value(property, env)?;
                    entries.insert(property.key.clone(), value);
                }

                Ok(Value::object(entries))
            }

            Expr::Call {
                caller,
                arguments,
                location,
            } => {
                // Only a bare identifier may be called; member-expression
                // callers parse but are not evaluated yet.
                let name: &str = match caller.as_ref() {
                    Expr::Identifier { name, .. } => name,
                    other => {
                        return Err(CalyxError::exception(
                            format!("Cannot call a {} expression", kind_name(other)),
                            location.clone(),
                        ));
                    }
                };

                let callee: Value = self.evaluate(caller, env)?;

                let native = match &callee.kind {
                    ValueKind::Native(native) => native.clone(),
                    _ => {
                        return Err(CalyxError::exception(
                            format!("'{}' is not callable (found {})", name, callee.type_name()),
                            location.clone(),
                        ));
                    }
                };

                let mut args: Vec<Value> = Vec::with_capacity(arguments.len());

                for argument in arguments {
                    args.push(self.evaluate(argument, env)?);
                }

                debug!("Invoking native '{}' with {} arguments", name, args.len());

                (native.func)(env, &args)
            }

            Expr::Member { location, .. } => Err(CalyxError::exception(
                "Member expressions are not evaluated yet",
                location.clone(),
            )),
        }
    }

    /// Resolve one object-literal property: an explicit value expression, or
    /// the shorthand lookup of a variable named after the key.
    fn property_value(&self, property: &Property, env: &ScopeRef) -> Result<Value> {
        match &property.value {
            Some(expr) => self.evaluate(expr, env),

            None => env
                .borrow()
                .lookup(&property.key)
                .map_err(|msg| CalyxError::exception(msg, property.location.clone())),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one of the fixed numeric operators. `/` and `%` intentionally
/// follow floating-point semantics with no zero guard.
fn apply_numeric(operator: &str, a: f64, b: f64) -> Value {
    let n: f64 = match operator {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "/" => a / b,
        "%" => a % b,
        "**" => a.powf(b),
        _ => unreachable!("operator validated against BINARY_OPERATORS"),
    };

    Value::number(n)
}

fn kind_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::Integer { .. } => "integer literal",
        Expr::Decimal { .. } => "decimal literal",
        Expr::Null { .. } => "null literal",
        Expr::Identifier { .. } => "identifier",
        Expr::Binary { .. } => "binary",
        Expr::Assign { .. } => "assignment",
        Expr::Object { .. } => "object literal",
        Expr::Call { .. } => "call",
        Expr::Member { .. } => "member",
    }
}
