//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime values
//! in the LearnScript interpreter, along with the JavaScript conversion rules the
//! interpreter relies on (`String(v)`, `Number(v)`, truthiness, equality).
//!
//! # Value Types
//!
//! - [`Value::Undefined`] / [`Value::Null`]: the two "empty" values
//! - [`Value::Bool`], [`Value::Number`] (IEEE 754 double), [`Value::String`]
//! - [`Value::Array`] / [`Value::Object`]: shared, mutable reference types
//! - [`Value::Function`]: a user closure
//! - [`Value::Native`]: a built-in function, optionally bound to a receiver
//!
//! Arrays and objects are reference types: cloning a `Value` clones the handle,
//! not the contents, so mutation through one binding is visible through all.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::scope::ScopeRef;
use crate::parser::ast::FunctionDef;

pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
pub type ObjectRef = Rc<RefCell<Object>>;
pub type PropertyMap = IndexMap<String, Value, FxBuildHasher>;

/// What kind of object a property bag represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    Plain,
    /// Instances created by `Error`, `TypeError`, ... or by the interpreter itself
    Error,
    /// Built-in namespaces such as `Math` or `console`
    Namespace(&'static str),
}

/// An insertion-ordered property bag
#[derive(Debug, Clone)]
pub struct Object {
    pub properties: PropertyMap,
    pub class: ObjectClass,
}

impl Object {
    pub fn new(class: ObjectClass) -> Self {
        Object {
            properties: PropertyMap::default(),
            class,
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.properties.get(key).cloned()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }
}

/// A user-defined function together with its captured environment
pub struct Closure {
    pub def: Rc<FunctionDef>,
    pub env: ScopeRef,
    /// `this` captured at creation time; only arrow functions use it
    pub lexical_this: Option<Value>,
}

impl Closure {
    pub fn name(&self) -> &str {
        self.def.name.as_deref().unwrap_or("")
    }
}

/// A built-in function. Methods carry the value they were read from.
#[derive(Debug, Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub receiver: Option<Value>,
}

/// Runtime values in the interpreter
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Function(Rc<Closure>),
    Native(Rc<NativeFunction>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(items) => match items.try_borrow() {
                Ok(items) => write!(f, "Array(len={})", items.len()),
                Err(_) => write!(f, "Array(<borrowed>)"),
            },
            Value::Object(obj) => match obj.try_borrow() {
                Ok(obj) => write!(f, "Object({:?}, keys={})", obj.class, obj.properties.len()),
                Err(_) => write!(f, "Object(<borrowed>)"),
            },
            Value::Function(closure) => write!(f, "Function({})", closure.name()),
            Value::Native(native) => write!(f, "Native({})", native.name),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Value {
    pub fn new_array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn new_object(object: Object) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn native(name: &'static str, receiver: Option<Value>) -> Self {
        Value::Native(Rc::new(NativeFunction { name, receiver }))
    }

    /// Build an error object with `name` and `message` properties
    pub fn new_error(name: &str, message: &str) -> Self {
        let mut object = Object::new(ObjectClass::Error);
        object.set("name", Value::from(name));
        object.set("message", Value::from(message));
        Value::new_object(object)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The `typeof` operator
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) | Value::Object(_) => "object",
            Value::Function(_) | Value::Native(_) => "function",
        }
    }

    /// JavaScript truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// `Number(v)` for primitives; reference types go through their string form
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_js_string()),
            Value::Object(_) | Value::Function(_) | Value::Native(_) => f64::NAN,
        }
    }

    /// `String(v)`
    pub fn to_js_string(&self) -> String {
        let mut out = String::new();
        self.write_js_string(&mut out, 0);
        out
    }

    fn write_js_string(&self, out: &mut String, depth: usize) {
        match self {
            Value::Undefined => out.push_str("undefined"),
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&number_to_string(*n)),
            Value::String(s) => out.push_str(s),
            Value::Array(items) => {
                // Self-referencing arrays render as empty, like Array.prototype.join
                if depth > 32 {
                    return;
                }
                let Ok(items) = items.try_borrow() else {
                    return;
                };
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    if !item.is_nullish() {
                        item.write_js_string(out, depth + 1);
                    }
                }
            }
            Value::Object(obj) => {
                let Ok(obj) = obj.try_borrow() else {
                    out.push_str("[object Object]");
                    return;
                };
                match obj.class {
                    ObjectClass::Error => {
                        let name = obj
                            .get("name")
                            .map(|v| v.to_js_string())
                            .unwrap_or_else(|| "Error".to_string());
                        let message = obj.get("message").map(|v| v.to_js_string()).unwrap_or_default();
                        if message.is_empty() {
                            out.push_str(&name);
                        } else if name.is_empty() {
                            out.push_str(&message);
                        } else {
                            out.push_str(&name);
                            out.push_str(": ");
                            out.push_str(&message);
                        }
                    }
                    ObjectClass::Namespace(name) => {
                        out.push_str("[object ");
                        out.push_str(name);
                        out.push(']');
                    }
                    ObjectClass::Plain => out.push_str("[object Object]"),
                }
            }
            Value::Function(closure) => {
                out.push_str("function ");
                out.push_str(closure.name());
                out.push_str("() { [code] }");
            }
            Value::Native(native) => {
                out.push_str("function ");
                out.push_str(native.name.rsplit('.').next().unwrap_or(native.name));
                out.push_str("() { [native code] }");
            }
        }
    }

    /// The `===` operator
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => {
                a.name == b.name
                    && match (&a.receiver, &b.receiver) {
                        (None, None) => true,
                        (Some(x), Some(y)) => x.strict_equals(y),
                        _ => false,
                    }
            }
            _ => false,
        }
    }

    /// The `==` operator (abstract equality)
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
                self.to_number() == other.to_number()
            }
            (Value::Bool(_), _) => Value::Number(self.to_number()).loose_equals(other),
            (_, Value::Bool(_)) => self.loose_equals(&Value::Number(other.to_number())),
            (Value::Array(_) | Value::Object(_), Value::Number(_) | Value::String(_)) => {
                Value::from(self.to_js_string()).loose_equals(other)
            }
            (Value::Number(_) | Value::String(_), Value::Array(_) | Value::Object(_)) => {
                self.loose_equals(&Value::from(other.to_js_string()))
            }
            _ => self.strict_equals(other),
        }
    }

    /// SameValueZero, used by `includes`
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }
}

/// Format a number the way JavaScript's `Number.prototype.toString()` does
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{}", n);
    }

    // Exponent form: Rust prints `1e21` / `1.5e-7`, JavaScript wants `1e+21` / `1.5e-7`
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// `Number(s)` for strings
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust accepts "inf" and "nan", JavaScript does not
    if trimmed
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(number_to_string(15.0), "15");
        assert_eq!(number_to_string(-3.5), "-3.5");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(123456789012.0), "123456789012");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(-0.0), "0");
    }

    #[test]
    fn test_array_to_string() {
        let arr = Value::new_array(vec![
            Value::Number(2.0),
            Value::Null,
            Value::from("x"),
            Value::new_array(vec![Value::Number(1.0), Value::Number(2.0)]),
        ]);
        assert_eq!(arr.to_js_string(), "2,,x,1,2");
    }

    #[test]
    fn test_error_to_string() {
        let err = Value::new_error("TypeError", "bad thing");
        assert_eq!(err.to_js_string(), "TypeError: bad thing");
        assert_eq!(Value::new_error("Error", "").to_js_string(), "Error");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(Value::new_array(vec![]).is_truthy());
        assert!(Value::from("0").is_truthy());
    }

    #[test]
    fn test_equality() {
        assert!(Value::Number(1.0).loose_equals(&Value::from("1")));
        assert!(!Value::Number(1.0).strict_equals(&Value::from("1")));
        assert!(Value::Null.loose_equals(&Value::Undefined));
        assert!(!Value::Null.loose_equals(&Value::Number(0.0)));
        assert!(Value::Bool(true).loose_equals(&Value::Number(1.0)));

        let arr = Value::new_array(vec![]);
        assert!(arr.strict_equals(&arr.clone()));
        assert!(!arr.strict_equals(&Value::new_array(vec![])));
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number("  42 "), 42.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0x1f"), 31.0);
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("inf").is_nan());
    }
}
