//! Native bindings seeded into the global scope: the `print`/`printf` output
//! helpers and the `math` namespace object. Natives are invoked with the
//! calling scope and the already-evaluated argument list, and render values
//! through the display rule shared with the rest of the crate.
//!
//! The math helpers follow the language's permissive arithmetic: a wrong
//! argument type or a missing argument yields null rather than an error.

use std::io::{self, Write};

use indexmap::IndexMap;
use log::{debug, info};
use memchr::memchr;

use crate::environment::ScopeRef;
use crate::error::Result;
use crate::value::Value;

/// Seed the bootstrap bindings into `globals`. Called once per global
/// environment on a freshly created scope; a name that is already bound
/// is left untouched rather than redeclared.
pub fn install(globals: &ScopeRef) {
    info!("Installing global bindings");

    let mut env = globals.borrow_mut();

    let seeded: [(&str, Value); 6] = [
        ("null", Value::null()),
        ("true", Value::bool(true)),
        ("false", Value::bool(false)),
        ("print", Value::native("print", native_print)),
        ("printf", Value::native("printf", native_printf)),
        ("math", math_namespace()),
    ];

    for (name, value) in seeded {
        if let Err(msg) = env.declare(name, value, true) {
            debug!("Skipped builtin binding: {}", msg);
        }
    }
}

// ───────────────────────────── output natives ───────────────────────────────

/// `print(v, ...)` — each argument's display form, space-separated, no
/// trailing newline.
fn native_print(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    debug!("print called with {} arguments", args.len());

    let rendered: Vec<String> = args.iter().map(Value::to_string).collect();

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", rendered.join(" "))?;
    stdout.flush()?;

    Ok(Value::null())
}

/// `printf(fmt, ...)` — `%`-placeholder substitution against the stringified
/// arguments, always terminated by a newline.
fn native_printf(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    debug!("printf called with {} arguments", args.len());

    let mut stdout = io::stdout().lock();

    match args.split_first() {
        Some((format, rest)) => {
            writeln!(stdout, "{}", substitute(&format.to_string(), rest))?;
        }
        None => writeln!(stdout)?,
    }

    Ok(Value::null())
}

/// Substitute `%`-style placeholders: `%` followed by an ASCII letter
/// consumes the next argument, `%%` is a literal percent sign. Surplus
/// placeholders stay verbatim; surplus arguments are ignored.
pub fn substitute(format: &str, args: &[Value]) -> String {
    let bytes: &[u8] = format.as_bytes();
    let mut out: String = String::with_capacity(format.len());
    let mut idx: usize = 0;
    let mut next_arg: usize = 0;

    while let Some(pos) = memchr(b'%', &bytes[idx..]) {
        let at: usize = idx + pos;
        out.push_str(&format[idx..at]);

        match bytes.get(at + 1) {
            Some(b'%') => {
                out.push('%');
                idx = at + 2;
            }

            Some(c) if c.is_ascii_alphabetic() => {
                if let Some(arg) = args.get(next_arg) {
                    out.push_str(&arg.to_string());
                    next_arg += 1;
                } else {
                    out.push_str(&format[at..at + 2]);
                }

                idx = at + 2;
            }

            // A bare '%' with no verb passes through untouched.
            _ => {
                out.push('%');
                idx = at + 1;
            }
        }
    }

    out.push_str(&format[idx..]);

    out
}

// ───────────────────────────── math namespace ───────────────────────────────

/// The readonly `math` namespace: constants plus numeric helpers.
fn math_namespace() -> Value {
    let mut entries: IndexMap<String, Value> = IndexMap::new();

    entries.insert("pi".into(), Value::number(std::f64::consts::PI));
    entries.insert("e".into(), Value::number(std::f64::consts::E));
    entries.insert("tau".into(), Value::number(std::f64::consts::TAU));

    entries.insert("abs".into(), Value::native("abs", math_abs));
    entries.insert("floor".into(), Value::native("floor", math_floor));
    entries.insert("ceil".into(), Value::native("ceil", math_ceil));
    entries.insert("round".into(), Value::native("round", math_round));
    entries.insert("sqrt".into(), Value::native("sqrt", math_sqrt));
    entries.insert("pow".into(), Value::native("pow", math_pow));
    entries.insert("min".into(), Value::native("min", math_min));
    entries.insert("max".into(), Value::native("max", math_max));

    Value::object(entries).readonly()
}

fn unary(args: &[Value], f: fn(f64) -> f64) -> Value {
    match args.first().and_then(Value::as_number) {
        Some(n) => Value::number(f(n)),
        None => Value::null(),
    }
}

fn binary(args: &[Value], f: fn(f64, f64) -> f64) -> Value {
    let a: Option<f64> = args.first().and_then(Value::as_number);
    let b: Option<f64> = args.get(1).and_then(Value::as_number);

    match (a, b) {
        (Some(a), Some(b)) => Value::number(f(a, b)),
        _ => Value::null(),
    }
}

fn math_abs(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    Ok(unary(args, f64::abs))
}

fn math_floor(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    Ok(unary(args, f64::floor))
}

fn math_ceil(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    Ok(unary(args, f64::ceil))
}

fn math_round(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    Ok(unary(args, f64::round))
}

fn math_sqrt(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    Ok(unary(args, f64::sqrt))
}

fn math_pow(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    Ok(binary(args, f64::powf))
}

fn math_min(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    Ok(binary(args, f64::min))
}

fn math_max(_env: &ScopeRef, args: &[Value]) -> Result<Value> {
    Ok(binary(args, f64::max))
}
