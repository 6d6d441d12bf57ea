//! Expression evaluation
//!
//! This module evaluates every expression node to a [`Value`]:
//!
//! - Literals, template literals, array and object literals
//! - Arithmetic, comparison, logical and bitwise operators with JavaScript coercions
//! - Assignment, compound assignment, `++`/`--`
//! - Property reads and writes on arrays, strings, objects and functions
//!
//! Calls and `new` are in `functions`; value methods are in `methods`.
//!
//! # Assignment Targets
//!
//! An assignment target is resolved once into an [`LValue`], so the object and
//! index expressions of `a[i()] += 1` are evaluated exactly once.

use std::rc::Rc;

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::methods;
use crate::memory::scope::{lookup, ScopeError};
use crate::memory::value::{number_to_string, Object, ObjectClass, Value};
use crate::parser::ast::*;

/// A property name, with canonical array indices kept numeric
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PropertyKey {
    Index(usize),
    Name(String),
}

impl PropertyKey {
    pub(crate) fn from_name(name: &str) -> Self {
        match parse_index(name) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::Name(name.to_string()),
        }
    }

    pub(crate) fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n < usize::MAX as f64 => {
                PropertyKey::Index(*n as usize)
            }
            Value::String(s) => PropertyKey::from_name(s),
            other => PropertyKey::from_name(&other.to_js_string()),
        }
    }

    pub(crate) fn as_string(&self) -> String {
        match self {
            PropertyKey::Index(i) => i.to_string(),
            PropertyKey::Name(name) => name.clone(),
        }
    }
}

/// `"12"` is an index, `"012"` and `"1.5"` are not
fn parse_index(name: &str) -> Option<usize> {
    if name.is_empty() || (name.len() > 1 && name.starts_with('0')) {
        return None;
    }
    if !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// A resolved assignment target
pub(crate) enum LValue {
    Variable(String),
    Property(Value, PropertyKey),
}

impl Interpreter<'_> {
    pub(crate) fn evaluate_expr(&mut self, expr: &AstNode) -> Result<Value, RuntimeError> {
        match expr {
            AstNode::NumberLiteral(n, _) => Ok(Value::Number(*n)),
            AstNode::StringLiteral(s, _) => Ok(Value::from(s.as_str())),
            AstNode::BoolLiteral(b, _) => Ok(Value::Bool(*b)),
            AstNode::Null { .. } => Ok(Value::Null),

            AstNode::TemplateLiteral { parts, location } => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => out.push_str(text),
                        TemplatePart::Expr(expr) => {
                            let value = self.evaluate_expr(expr)?;
                            out.push_str(&value.to_js_string());
                        }
                    }
                }
                self.check_string_len(&out, *location)?;
                Ok(Value::from(out))
            }

            AstNode::ArrayLiteral { elements, location } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.evaluate_expr(element)?);
                }
                self.check_collection_len(items.len(), *location)?;
                Ok(self.alloc_array(items))
            }

            AstNode::ObjectLiteral { properties, .. } => {
                let mut object = Object::new(ObjectClass::Plain);
                for prop in properties {
                    let value = self.evaluate_expr(&prop.value)?;
                    object.set(prop.key.clone(), value);
                }
                Ok(self.alloc_object(object))
            }

            AstNode::Variable(name, location) => {
                self.current_location = *location;
                self.lookup_variable(name, *location)
            }

            AstNode::This { .. } => Ok(self.this.clone()),

            AstNode::FunctionExpr { func, .. } => Ok(self.make_closure(func)),

            AstNode::BinaryOp {
                op,
                left,
                right,
                location,
            } => self.evaluate_binary(*op, left, right, *location),

            AstNode::UnaryOp {
                op,
                operand,
                location,
            } => self.evaluate_unary(*op, operand, *location),

            AstNode::Assignment { lhs, rhs, location } => {
                let target = self.resolve_lvalue(lhs, *location)?;
                let value = self.evaluate_expr(rhs)?;
                self.write_lvalue(&target, value.clone(), *location)?;
                Ok(value)
            }

            AstNode::CompoundAssignment {
                lhs,
                op,
                rhs,
                location,
            } => {
                let target = self.resolve_lvalue(lhs, *location)?;
                let current = self.read_lvalue(&target, *location)?;
                let value = match op {
                    BinOp::And if !current.is_truthy() => return Ok(current),
                    BinOp::Or if current.is_truthy() => return Ok(current),
                    BinOp::Nullish if !current.is_nullish() => return Ok(current),
                    BinOp::And | BinOp::Or | BinOp::Nullish => self.evaluate_expr(rhs)?,
                    _ => {
                        let rhs = self.evaluate_expr(rhs)?;
                        self.binary_op(*op, &current, &rhs, *location)?
                    }
                };
                self.write_lvalue(&target, value.clone(), *location)?;
                Ok(value)
            }

            AstNode::TernaryOp {
                condition,
                true_expr,
                false_expr,
                ..
            } => {
                if self.evaluate_expr(condition)?.is_truthy() {
                    self.evaluate_expr(true_expr)
                } else {
                    self.evaluate_expr(false_expr)
                }
            }

            AstNode::MemberAccess {
                object,
                member,
                location,
            } => {
                let target = self.evaluate_expr(object)?;
                self.get_property(&target, &PropertyKey::Name(member.clone()), *location)
            }

            AstNode::IndexAccess {
                object,
                index,
                location,
            } => {
                let target = self.evaluate_expr(object)?;
                let key = self.evaluate_expr(index)?;
                self.get_property(&target, &PropertyKey::from_value(&key), *location)
            }

            AstNode::Call {
                callee,
                args,
                location,
            } => self.evaluate_call(callee, args, *location),

            AstNode::New {
                constructor,
                args,
                location,
            } => self.evaluate_new(constructor, args, *location),

            other => Err(RuntimeError::Syntax {
                message: "Unexpected statement in expression position".to_string(),
                location: other.location(),
            }),
        }
    }

    fn evaluate_binary(
        &mut self,
        op: BinOp,
        left: &AstNode,
        right: &AstNode,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let lhs = self.evaluate_expr(left)?;
        match op {
            BinOp::And => {
                if lhs.is_truthy() {
                    self.evaluate_expr(right)
                } else {
                    Ok(lhs)
                }
            }
            BinOp::Or => {
                if lhs.is_truthy() {
                    Ok(lhs)
                } else {
                    self.evaluate_expr(right)
                }
            }
            BinOp::Nullish => {
                if lhs.is_nullish() {
                    self.evaluate_expr(right)
                } else {
                    Ok(lhs)
                }
            }
            _ => {
                let rhs = self.evaluate_expr(right)?;
                self.binary_op(op, &lhs, &rhs, location)
            }
        }
    }

    /// Apply a non-short-circuiting binary operator
    pub(crate) fn binary_op(
        &mut self,
        op: BinOp,
        lhs: &Value,
        rhs: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let result = match op {
            BinOp::Add => {
                if concatenates(lhs) || concatenates(rhs) {
                    let mut out = lhs.to_js_string();
                    out.push_str(&rhs.to_js_string());
                    self.check_string_len(&out, location)?;
                    Value::from(out)
                } else {
                    Value::Number(lhs.to_number() + rhs.to_number())
                }
            }
            BinOp::Sub => Value::Number(lhs.to_number() - rhs.to_number()),
            BinOp::Mul => Value::Number(lhs.to_number() * rhs.to_number()),
            BinOp::Div => Value::Number(lhs.to_number() / rhs.to_number()),
            BinOp::Mod => Value::Number(lhs.to_number() % rhs.to_number()),
            BinOp::Pow => Value::Number(js_pow(lhs.to_number(), rhs.to_number())),

            BinOp::Eq => Value::Bool(lhs.loose_equals(rhs)),
            BinOp::Ne => Value::Bool(!lhs.loose_equals(rhs)),
            BinOp::StrictEq => Value::Bool(lhs.strict_equals(rhs)),
            BinOp::StrictNe => Value::Bool(!lhs.strict_equals(rhs)),

            BinOp::Lt => Value::Bool(compare(lhs, rhs, |o| o.is_lt())),
            BinOp::Le => Value::Bool(compare(lhs, rhs, |o| o.is_le())),
            BinOp::Gt => Value::Bool(compare(lhs, rhs, |o| o.is_gt())),
            BinOp::Ge => Value::Bool(compare(lhs, rhs, |o| o.is_ge())),

            BinOp::BitAnd => int32_value(to_int32(lhs.to_number()) & to_int32(rhs.to_number())),
            BinOp::BitOr => int32_value(to_int32(lhs.to_number()) | to_int32(rhs.to_number())),
            BinOp::BitXor => int32_value(to_int32(lhs.to_number()) ^ to_int32(rhs.to_number())),
            BinOp::BitShl => {
                let shift = (to_int32(rhs.to_number()) & 31) as u32;
                int32_value(to_int32(lhs.to_number()).wrapping_shl(shift))
            }
            BinOp::BitShr => {
                let shift = (to_int32(rhs.to_number()) & 31) as u32;
                int32_value(to_int32(lhs.to_number()) >> shift)
            }

            // Short-circuiting operators reach here only from compound assignment
            BinOp::And => {
                if lhs.is_truthy() {
                    rhs.clone()
                } else {
                    lhs.clone()
                }
            }
            BinOp::Or => {
                if lhs.is_truthy() {
                    lhs.clone()
                } else {
                    rhs.clone()
                }
            }
            BinOp::Nullish => {
                if lhs.is_nullish() {
                    rhs.clone()
                } else {
                    lhs.clone()
                }
            }
        };
        Ok(result)
    }

    fn evaluate_unary(
        &mut self,
        op: UnOp,
        operand: &AstNode,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match op {
            UnOp::Neg => Ok(Value::Number(-self.evaluate_expr(operand)?.to_number())),
            UnOp::Plus => Ok(Value::Number(self.evaluate_expr(operand)?.to_number())),
            UnOp::Not => Ok(Value::Bool(!self.evaluate_expr(operand)?.is_truthy())),
            UnOp::BitNot => {
                let n = self.evaluate_expr(operand)?.to_number();
                Ok(int32_value(!to_int32(n)))
            }
            UnOp::Typeof => {
                // `typeof undeclared` is "undefined" rather than a ReferenceError
                if let AstNode::Variable(name, loc) = operand {
                    return match lookup(&self.scope, name) {
                        Ok(value) => Ok(Value::from(value.type_of())),
                        Err(ScopeError::NotDefined) => Ok(Value::from("undefined")),
                        Err(err) => Err(Self::scope_error(err, name, *loc)),
                    };
                }
                let value = self.evaluate_expr(operand)?;
                Ok(Value::from(value.type_of()))
            }
            UnOp::PreInc | UnOp::PreDec | UnOp::PostInc | UnOp::PostDec => {
                let target = self.resolve_lvalue(operand, location)?;
                let old = self.read_lvalue(&target, location)?.to_number();
                let new = match op {
                    UnOp::PreInc | UnOp::PostInc => old + 1.0,
                    _ => old - 1.0,
                };
                self.write_lvalue(&target, Value::Number(new), location)?;
                match op {
                    UnOp::PreInc | UnOp::PreDec => Ok(Value::Number(new)),
                    _ => Ok(Value::Number(old)),
                }
            }
        }
    }

    // ===== Assignment targets =====

    pub(crate) fn resolve_lvalue(
        &mut self,
        target: &AstNode,
        location: SourceLocation,
    ) -> Result<LValue, RuntimeError> {
        match target {
            AstNode::Variable(name, _) => Ok(LValue::Variable(name.clone())),
            AstNode::MemberAccess { object, member, .. } => {
                let object = self.evaluate_expr(object)?;
                Ok(LValue::Property(object, PropertyKey::Name(member.clone())))
            }
            AstNode::IndexAccess { object, index, .. } => {
                let object = self.evaluate_expr(object)?;
                let key = self.evaluate_expr(index)?;
                Ok(LValue::Property(object, PropertyKey::from_value(&key)))
            }
            _ => Err(RuntimeError::Syntax {
                message: "Invalid left-hand side in assignment".to_string(),
                location,
            }),
        }
    }

    pub(crate) fn read_lvalue(
        &mut self,
        target: &LValue,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match target {
            LValue::Variable(name) => self.lookup_variable(name, location),
            LValue::Property(object, key) => self.get_property(object, key, location),
        }
    }

    pub(crate) fn write_lvalue(
        &mut self,
        target: &LValue,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match target {
            LValue::Variable(name) => self.assign_variable(name, value, location),
            LValue::Property(object, key) => self.set_property(object, key, value, location),
        }
    }

    // ===== Properties =====

    /// Read `target[key]`
    pub(crate) fn get_property(
        &mut self,
        target: &Value,
        key: &PropertyKey,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let value = match target {
            Value::Undefined | Value::Null => {
                return Err(RuntimeError::type_error(
                    format!(
                        "Cannot read properties of {} (reading '{}')",
                        target.to_js_string(),
                        key.as_string()
                    ),
                    location,
                ));
            }

            Value::Array(items) => match key {
                PropertyKey::Index(i) => items.borrow().get(*i).cloned().unwrap_or_default(),
                PropertyKey::Name(name) if name == "length" => {
                    Value::Number(items.borrow().len() as f64)
                }
                PropertyKey::Name(name) => methods::array_method(name)
                    .map(|method| Value::native(method, Some(target.clone())))
                    .unwrap_or_default(),
            },

            Value::String(text) => match key {
                PropertyKey::Index(i) => text
                    .chars()
                    .nth(*i)
                    .map(|c| Value::from(c.to_string()))
                    .unwrap_or_default(),
                PropertyKey::Name(name) if name == "length" => {
                    Value::Number(text.chars().count() as f64)
                }
                PropertyKey::Name(name) => methods::string_method(name)
                    .map(|method| Value::native(method, Some(target.clone())))
                    .unwrap_or_default(),
            },

            Value::Number(_) => match key {
                PropertyKey::Name(name) => methods::number_method(name)
                    .map(|method| Value::native(method, Some(target.clone())))
                    .unwrap_or_default(),
                PropertyKey::Index(_) => Value::Undefined,
            },

            Value::Bool(_) => match key {
                PropertyKey::Name(name) if name == "toString" => {
                    Value::native("toString", Some(target.clone()))
                }
                _ => Value::Undefined,
            },

            Value::Object(obj) => {
                let name = key.as_string();
                let own = obj.borrow().get(&name);
                match own {
                    Some(value) => value,
                    None => methods::object_method(&name)
                        .map(|method| Value::native(method, Some(target.clone())))
                        .unwrap_or_default(),
                }
            }

            Value::Function(closure) => match key {
                PropertyKey::Name(name) if name == "name" => Value::from(closure.name()),
                PropertyKey::Name(name) if name == "length" => {
                    let required = closure
                        .def
                        .params
                        .iter()
                        .take_while(|p| p.default.is_none())
                        .count();
                    Value::Number(required as f64)
                }
                _ => Value::Undefined,
            },

            Value::Native(native) => match key {
                PropertyKey::Name(name) if name == "name" => {
                    Value::from(native.name.rsplit('.').next().unwrap_or(native.name))
                }
                _ => Value::Undefined,
            },
        };
        Ok(value)
    }

    /// Write `target[key] = value`
    pub(crate) fn set_property(
        &mut self,
        target: &Value,
        key: &PropertyKey,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match target {
            Value::Undefined | Value::Null => Err(RuntimeError::type_error(
                format!(
                    "Cannot set properties of {} (setting '{}')",
                    target.to_js_string(),
                    key.as_string()
                ),
                location,
            )),

            Value::Array(items) => {
                match key {
                    PropertyKey::Index(i) => {
                        let len = items.borrow().len();
                        if *i >= len {
                            self.check_collection_len(i.saturating_add(1), location)?;
                            items.borrow_mut().resize(i + 1, Value::Undefined);
                        }
                        items.borrow_mut()[*i] = value;
                    }
                    PropertyKey::Name(name) if name == "length" => {
                        let n = value.to_number();
                        if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
                            return Err(RuntimeError::range("Invalid array length", location));
                        }
                        let new_len = n as usize;
                        self.check_collection_len(new_len, location)?;
                        items.borrow_mut().resize(new_len, Value::Undefined);
                    }
                    // Named properties on arrays are not tracked
                    PropertyKey::Name(_) => {}
                }
                Ok(())
            }

            Value::Object(obj) => {
                obj.borrow_mut().set(key.as_string(), value);
                Ok(())
            }

            // Primitives and functions silently drop property writes
            _ => Ok(()),
        }
    }

    /// Short source text for an expression, used in error messages
    pub(crate) fn expression_text(expr: &AstNode) -> String {
        match expr {
            AstNode::Variable(name, _) => name.clone(),
            AstNode::This { .. } => "this".to_string(),
            AstNode::MemberAccess { object, member, .. } => {
                format!("{}.{}", Self::expression_text(object), member)
            }
            AstNode::IndexAccess { object, index, .. } => {
                let index = match index.as_ref() {
                    AstNode::NumberLiteral(n, _) => number_to_string(*n),
                    AstNode::StringLiteral(s, _) => format!("\"{}\"", s),
                    other => Self::expression_text(other),
                };
                format!("{}[{}]", Self::expression_text(object), index)
            }
            AstNode::Call { callee, .. } => format!("{}(...)", Self::expression_text(callee)),
            AstNode::NumberLiteral(n, _) => number_to_string(*n),
            AstNode::StringLiteral(s, _) => format!("\"{}\"", s),
            AstNode::BoolLiteral(b, _) => b.to_string(),
            AstNode::Null { .. } => "null".to_string(),
            _ => "expression".to_string(),
        }
    }
}

/// `+` concatenates when either side is a string or a reference type
fn concatenates(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_)
    )
}

/// Relational comparison: string-wise when both sides are strings after
/// converting reference types, numeric otherwise; `NaN` compares false
fn compare(lhs: &Value, rhs: &Value, test: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    let lhs = to_primitive(lhs);
    let rhs = to_primitive(rhs);
    if let (Value::String(a), Value::String(b)) = (&lhs, &rhs) {
        return test(a.cmp(b));
    }
    match lhs.to_number().partial_cmp(&rhs.to_number()) {
        Some(ordering) => test(ordering),
        None => false,
    }
}

fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Native(_) => {
            Value::String(Rc::from(value.to_js_string()))
        }
        other => other.clone(),
    }
}

/// `Math.pow` / `**`, which differs from `f64::powf` for NaN exponents and
/// for a base of ±1 with an infinite exponent
pub(crate) fn js_pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() {
        return f64::NAN;
    }
    if base.abs() == 1.0 && exponent.is_infinite() {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// ECMAScript ToInt32
pub(crate) fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    let wrapped = n.trunc().rem_euclid(4_294_967_296.0);
    wrapped as u32 as i32
}

fn int32_value(n: i32) -> Value {
    Value::Number(n as f64)
}
