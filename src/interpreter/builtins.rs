//! Built-in global library
//!
//! This module installs the globals every script can see and implements the
//! free-standing native functions.
//!
//! # Supported Built-ins
//!
//! - `console.log/info/warn/error/debug`: one output line per call
//! - `Math`: `PI`, `E` and the usual numeric functions, `Math.random` included
//! - `String`, `Number`, `Boolean`, `parseInt`, `parseFloat`, `isNaN`, `isFinite`
//! - `Array.isArray`, `Object.keys/values/entries`, `JSON.stringify`
//! - `Error`, `TypeError`, `RangeError`, `ReferenceError`, `SyntaxError`
//! - `NaN`, `Infinity`, `undefined`
//!
//! # Implementation Notes
//!
//! - Globals live in a realm scope above the script's global scope, so a
//!   script may shadow any of them with its own declaration
//! - Natives are identified by their qualified name (`"Math.floor"`); methods
//!   bound to a receiver are dispatched in `methods`

use std::rc::Rc;

use rand::Rng;

use crate::interpreter::constants::MAX_VALUE_DEPTH;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::expressions::js_pow;
use crate::memory::value::{number_to_string, NativeFunction, Object, ObjectClass, Value};
use crate::parser::ast::SourceLocation;

const CONSOLE_FUNCTIONS: &[(&str, &str)] = &[
    ("log", "console.log"),
    ("info", "console.info"),
    ("warn", "console.warn"),
    ("error", "console.error"),
    ("debug", "console.debug"),
];

const MATH_FUNCTIONS: &[(&str, &str)] = &[
    ("abs", "Math.abs"),
    ("floor", "Math.floor"),
    ("ceil", "Math.ceil"),
    ("round", "Math.round"),
    ("trunc", "Math.trunc"),
    ("sqrt", "Math.sqrt"),
    ("cbrt", "Math.cbrt"),
    ("pow", "Math.pow"),
    ("max", "Math.max"),
    ("min", "Math.min"),
    ("random", "Math.random"),
    ("sign", "Math.sign"),
    ("log", "Math.log"),
    ("exp", "Math.exp"),
    ("sin", "Math.sin"),
    ("cos", "Math.cos"),
    ("tan", "Math.tan"),
];

const OBJECT_FUNCTIONS: &[(&str, &str)] = &[
    ("keys", "Object.keys"),
    ("values", "Object.values"),
    ("entries", "Object.entries"),
];

const GLOBAL_FUNCTIONS: &[&str] = &[
    "String",
    "Number",
    "Boolean",
    "parseInt",
    "parseFloat",
    "isNaN",
    "isFinite",
    "Error",
    "TypeError",
    "RangeError",
    "ReferenceError",
    "SyntaxError",
];

/// Define every global in the interpreter's realm scope
pub(crate) fn install_globals(interp: &mut Interpreter<'_>) {
    let mut globals: Vec<(&str, Value)> = Vec::new();

    let console = namespace(interp, "console", CONSOLE_FUNCTIONS, &[]);
    globals.push(("console", console));

    let math = namespace(
        interp,
        "Math",
        MATH_FUNCTIONS,
        &[("PI", std::f64::consts::PI), ("E", std::f64::consts::E)],
    );
    globals.push(("Math", math));

    let object = namespace(interp, "Object", OBJECT_FUNCTIONS, &[]);
    globals.push(("Object", object));

    let array = namespace(interp, "Array", &[("isArray", "Array.isArray")], &[]);
    globals.push(("Array", array));

    let json = namespace(interp, "JSON", &[("stringify", "JSON.stringify")], &[]);
    globals.push(("JSON", json));

    for &name in GLOBAL_FUNCTIONS {
        globals.push((name, Value::native(name, None)));
    }

    globals.push(("NaN", Value::Number(f64::NAN)));
    globals.push(("Infinity", Value::Number(f64::INFINITY)));
    globals.push(("undefined", Value::Undefined));

    let realm = Rc::clone(interp.realm());
    let mut scope = realm.borrow_mut();
    for (name, value) in globals {
        scope.initialize(name, value);
    }
}

fn namespace(
    interp: &mut Interpreter<'_>,
    name: &'static str,
    functions: &[(&str, &'static str)],
    constants: &[(&str, f64)],
) -> Value {
    let mut object = Object::new(ObjectClass::Namespace(name));
    for &(property, qualified) in functions {
        object.set(property, Value::native(qualified, None));
    }
    for &(property, value) in constants {
        object.set(property, Value::Number(value));
    }
    interp.alloc_object(object)
}

impl Interpreter<'_> {
    /// Invoke a native function or bound method
    pub(crate) fn call_native(
        &mut self,
        native: &NativeFunction,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if let Some(receiver) = &native.receiver {
            return self.call_method(native.name, receiver, args, location);
        }

        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();
        let num = |i: usize| args.get(i).map(Value::to_number).unwrap_or(f64::NAN);

        let result = match native.name {
            "console.log" | "console.info" | "console.warn" | "console.error" | "console.debug" => {
                let line = args
                    .iter()
                    .map(Value::to_js_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.print_line(&line)?;
                Value::Undefined
            }

            "Math.abs" => Value::Number(num(0).abs()),
            "Math.floor" => Value::Number(num(0).floor()),
            "Math.ceil" => Value::Number(num(0).ceil()),
            "Math.round" => Value::Number(js_round(num(0))),
            "Math.trunc" => Value::Number(num(0).trunc()),
            "Math.sqrt" => Value::Number(num(0).sqrt()),
            "Math.cbrt" => Value::Number(num(0).cbrt()),
            "Math.pow" => Value::Number(js_pow(num(0), num(1))),
            "Math.max" => Value::Number(fold_numbers(&args, f64::NEG_INFINITY, f64::max)),
            "Math.min" => Value::Number(fold_numbers(&args, f64::INFINITY, f64::min)),
            "Math.random" => Value::Number(self.rng.random::<f64>()),
            "Math.sign" => {
                let n = num(0);
                Value::Number(if n.is_nan() || n == 0.0 { n } else { n.signum() })
            }
            "Math.log" => Value::Number(num(0).ln()),
            "Math.exp" => Value::Number(num(0).exp()),
            "Math.sin" => Value::Number(num(0).sin()),
            "Math.cos" => Value::Number(num(0).cos()),
            "Math.tan" => Value::Number(num(0).tan()),

            "String" => match args.first() {
                Some(value) => Value::from(value.to_js_string()),
                None => Value::from(""),
            },
            "Number" => match args.first() {
                Some(value) => Value::Number(value.to_number()),
                None => Value::Number(0.0),
            },
            "Boolean" => Value::Bool(arg(0).is_truthy()),
            "parseInt" => {
                let radix = args.get(1).map(Value::to_number);
                Value::Number(parse_int(&arg(0).to_js_string(), radix))
            }
            "parseFloat" => Value::Number(parse_float(&arg(0).to_js_string())),
            "isNaN" => Value::Bool(arg(0).to_number().is_nan()),
            "isFinite" => Value::Bool(arg(0).to_number().is_finite()),

            "Error" | "TypeError" | "RangeError" | "ReferenceError" | "SyntaxError" => {
                let message = match args.first() {
                    Some(Value::Undefined) | None => String::new(),
                    Some(value) => value.to_js_string(),
                };
                self.alloc_error(native.name, &message)
            }

            "Array.isArray" => Value::Bool(matches!(arg(0), Value::Array(_))),

            "Object.keys" | "Object.values" | "Object.entries" => {
                self.object_enumerate(native.name, &arg(0), location)?
            }

            "JSON.stringify" => {
                let indent = json_indent(&arg(2));
                let mut seen = Vec::new();
                match json_stringify(&arg(0), &indent, "", &mut seen) {
                    Ok(Some(text)) => {
                        self.check_string_len(&text, location)?;
                        Value::from(text)
                    }
                    Ok(None) => Value::Undefined,
                    Err(JsonError::Circular) => {
                        return Err(RuntimeError::type_error(
                            "Converting circular structure to JSON",
                            location,
                        ))
                    }
                    Err(JsonError::TooDeep) => {
                        return Err(RuntimeError::range(
                            "Maximum call stack size exceeded",
                            location,
                        ))
                    }
                }
            }

            other => {
                return Err(RuntimeError::type_error(
                    format!("{} is not a function", other),
                    location,
                ))
            }
        };
        Ok(result)
    }

    pub(crate) fn is_error_constructor(name: &str) -> bool {
        matches!(
            name,
            "Error" | "TypeError" | "RangeError" | "ReferenceError" | "SyntaxError"
        )
    }

    fn object_enumerate(
        &mut self,
        which: &str,
        target: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let entries: Vec<(String, Value)> = match target {
            Value::Undefined | Value::Null => {
                return Err(RuntimeError::type_error(
                    "Cannot convert undefined or null to object",
                    location,
                ))
            }
            Value::Object(obj) => obj
                .borrow()
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            Value::Array(items) => items
                .borrow()
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect(),
            Value::String(text) => text
                .chars()
                .enumerate()
                .map(|(i, c)| (i.to_string(), Value::from(c.to_string())))
                .collect(),
            _ => Vec::new(),
        };

        let items = match which {
            "Object.keys" => entries.into_iter().map(|(k, _)| Value::from(k)).collect(),
            "Object.values" => entries.into_iter().map(|(_, v)| v).collect(),
            _ => entries
                .into_iter()
                .map(|(k, v)| self.alloc_array(vec![Value::from(k), v]))
                .collect(),
        };
        Ok(self.alloc_array(items))
    }
}

/// `Math.round`: halves round toward +Infinity
fn js_round(n: f64) -> f64 {
    if !n.is_finite() {
        return n;
    }
    let floor = n.floor();
    if n - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// `Math.max` / `Math.min`: any NaN argument makes the result NaN
fn fold_numbers(args: &[Value], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    let mut acc = init;
    for arg in args {
        let n = arg.to_number();
        if n.is_nan() {
            return f64::NAN;
        }
        acc = pick(acc, n);
    }
    acc
}

/// `parseInt(text, radix)`
pub(crate) fn parse_int(text: &str, radix: Option<f64>) -> f64 {
    let mut s = text.trim_start();
    let mut sign = 1.0;
    if let Some(rest) = s.strip_prefix('-') {
        sign = -1.0;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    let mut radix = match radix {
        Some(r) if r.is_finite() && r.trunc() != 0.0 => r.trunc() as i64,
        _ => 0,
    };
    if radix != 0 && !(2..=36).contains(&radix) {
        return f64::NAN;
    }
    if radix == 0 || radix == 16 {
        if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            s = rest;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }

    let mut value = 0.0;
    let mut any = false;
    for c in s.chars() {
        match c.to_digit(radix as u32) {
            Some(d) => {
                value = value * radix as f64 + d as f64;
                any = true;
            }
            None => break,
        }
    }
    if any {
        sign * value
    } else {
        f64::NAN
    }
}

/// `parseFloat(text)`: the longest decimal prefix, ignoring what follows
pub(crate) fn parse_float(text: &str) -> f64 {
    let s = text.trim_start();
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned.starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }
    // Exponent only counts when digits follow it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Indentation string for `JSON.stringify`'s third argument
fn json_indent(space: &Value) -> String {
    match space {
        Value::Number(n) if *n >= 1.0 => " ".repeat(n.min(10.0) as usize),
        Value::String(s) => s.chars().take(10).collect(),
        _ => String::new(),
    }
}

/// Why `JSON.stringify` gave up on a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonError {
    Circular,
    /// Containers nested deeper than `MAX_VALUE_DEPTH`
    TooDeep,
}

/// Serialize a value; `Ok(None)` when the value has no JSON form
/// (`undefined`, functions). `seen` is the stack of containers being
/// serialized, so its length is the current nesting depth.
fn json_stringify(
    value: &Value,
    indent: &str,
    current: &str,
    seen: &mut Vec<*const ()>,
) -> Result<Option<String>, JsonError> {
    let text = match value {
        Value::Undefined | Value::Function(_) | Value::Native(_) => return Ok(None),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) if n.is_finite() => number_to_string(*n),
        Value::Number(_) => "null".to_string(),
        Value::String(s) => json_quote(s),

        Value::Array(items) => {
            let ptr = Rc::as_ptr(items) as *const ();
            enter_container(seen, ptr)?;
            let inner = format!("{}{}", current, indent);
            let mut parts = Vec::new();
            for item in items.borrow().iter() {
                let part = json_stringify(item, indent, &inner, seen)?;
                parts.push(part.unwrap_or_else(|| "null".to_string()));
            }
            seen.pop();
            wrap_json('[', ']', parts, indent, current)
        }

        Value::Object(obj) => {
            let ptr = Rc::as_ptr(obj) as *const ();
            enter_container(seen, ptr)?;
            let inner = format!("{}{}", current, indent);
            let mut parts = Vec::new();
            let obj = obj.borrow();
            if obj.class == ObjectClass::Plain {
                let separator = if indent.is_empty() { ":" } else { ": " };
                for (key, item) in obj.properties.iter() {
                    if let Some(part) = json_stringify(item, indent, &inner, seen)? {
                        parts.push(format!("{}{}{}", json_quote(key), separator, part));
                    }
                }
            }
            seen.pop();
            wrap_json('{', '}', parts, indent, current)
        }
    };
    Ok(Some(text))
}

fn enter_container(seen: &mut Vec<*const ()>, ptr: *const ()) -> Result<(), JsonError> {
    if seen.contains(&ptr) {
        return Err(JsonError::Circular);
    }
    if seen.len() >= MAX_VALUE_DEPTH {
        return Err(JsonError::TooDeep);
    }
    seen.push(ptr);
    Ok(())
}

fn wrap_json(open: char, close: char, parts: Vec<String>, indent: &str, current: &str) -> String {
    if parts.is_empty() {
        return format!("{}{}", open, close);
    }
    if indent.is_empty() {
        return format!("{}{}{}", open, parts.join(","), close);
    }
    let inner = format!("{}{}", current, indent);
    let body = parts
        .iter()
        .map(|p| format!("{}{}", inner, p))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{}\n{}\n{}{}", open, body, current, close)
}

fn json_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
