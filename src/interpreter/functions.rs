//! Function calls and `new`
//!
//! A call to a user closure creates a function scope below the scope the
//! closure captured, binds the parameters there and runs the body. `this` is
//! the receiver for method calls (`obj.m()`), `undefined` for plain calls, and
//! the captured value for arrow functions.
//!
//! The interpreter state touched by a call (current scope, `this`, call depth)
//! is restored on the way out whether the body returned or threw.

use std::rc::Rc;

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::expressions::PropertyKey;
use crate::memory::scope::{Binding, BindingKind};
use crate::memory::value::{Closure, Object, ObjectClass, Value};
use crate::parser::ast::*;

impl Interpreter<'_> {
    pub(crate) fn evaluate_call(
        &mut self,
        callee: &AstNode,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let (func, this) = match callee {
            AstNode::MemberAccess {
                object,
                member,
                location: member_loc,
            } => {
                let receiver = self.evaluate_expr(object)?;
                let func =
                    self.get_property(&receiver, &PropertyKey::Name(member.clone()), *member_loc)?;
                (func, receiver)
            }
            AstNode::IndexAccess {
                object,
                index,
                location: index_loc,
            } => {
                let receiver = self.evaluate_expr(object)?;
                let key = self.evaluate_expr(index)?;
                let func = self.get_property(&receiver, &PropertyKey::from_value(&key), *index_loc)?;
                (func, receiver)
            }
            other => (self.evaluate_expr(other)?, Value::Undefined),
        };

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate_expr(arg)?);
        }

        if !func.is_callable() {
            return Err(RuntimeError::type_error(
                format!("{} is not a function", Self::expression_text(callee)),
                location,
            ));
        }

        self.current_location = location;
        self.call_value(&func, this, arg_values, location)
    }

    /// Call any callable value with an explicit `this`
    pub(crate) fn call_value(
        &mut self,
        func: &Value,
        this: Value,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        self.tick()?;
        match func {
            Value::Function(closure) => self.call_closure(closure, this, args, location),
            Value::Native(native) => {
                let native = Rc::clone(native);
                self.call_native(&native, args, location)
            }
            other => Err(RuntimeError::type_error(
                format!("{} is not a function", other.to_js_string()),
                location,
            )),
        }
    }

    pub(crate) fn call_closure(
        &mut self,
        closure: &Rc<Closure>,
        this: Value,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if self.call_depth >= self.limits().max_call_depth {
            return Err(RuntimeError::CallStackExceeded { location });
        }

        let scope = self.new_function_scope(&closure.env);
        let saved_scope = std::mem::replace(&mut self.scope, scope);
        let this = match &closure.lexical_this {
            Some(lexical) => lexical.clone(),
            None => this,
        };
        let saved_this = std::mem::replace(&mut self.this, this);
        self.call_depth += 1;

        let result = self.run_closure_body(closure, args);

        self.call_depth -= 1;
        self.this = saved_this;
        self.scope = saved_scope;
        self.control_flow = ControlFlow::Normal;

        result
    }

    fn run_closure_body(
        &mut self,
        closure: &Rc<Closure>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let def = &closure.def;

        let mut args = args.into_iter();
        for param in &def.params {
            let mut value = args.next().unwrap_or_default();
            if matches!(value, Value::Undefined) {
                if let Some(default) = &param.default {
                    value = self.evaluate_expr(default)?;
                }
            }
            self.declare(&param.name, Binding::new(BindingKind::Param, value), def.location)?;
        }

        match &def.body {
            FunctionBody::Expression(expr) => self.evaluate_expr(expr),
            FunctionBody::Block(statements) => {
                let scope = Rc::clone(&self.scope);
                self.hoist_vars(statements, &scope)?;
                self.hoist_block(statements)?;
                self.execute_statements(statements)?;

                match self.control_flow {
                    ControlFlow::Normal => Ok(Value::Undefined),
                    ControlFlow::Return => {
                        self.control_flow = ControlFlow::Normal;
                        Ok(std::mem::take(&mut self.return_value))
                    }
                    ControlFlow::Break | ControlFlow::Continue => Err(self.illegal_jump()),
                }
            }
        }
    }

    /// `new Name(args)`
    pub(crate) fn evaluate_new(
        &mut self,
        constructor: &str,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let target = self.lookup_variable(constructor, location)?;

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate_expr(arg)?);
        }
        self.current_location = location;

        match &target {
            Value::Function(closure) if !closure.def.is_arrow => {
                let instance = self.alloc_object(Object::new(ObjectClass::Plain));
                let closure = Rc::clone(closure);
                self.tick()?;
                let result = self.call_closure(&closure, instance.clone(), arg_values, location)?;
                match result {
                    Value::Object(_) | Value::Array(_) => Ok(result),
                    _ => Ok(instance),
                }
            }
            Value::Native(native) if Self::is_error_constructor(native.name) => {
                let native = Rc::clone(native);
                self.call_native(&native, arg_values, location)
            }
            Value::Object(obj) => {
                let class = obj.borrow().class;
                match class {
                    ObjectClass::Namespace("Array") => self.construct_array(arg_values, location),
                    ObjectClass::Namespace("Object") => {
                        Ok(self.alloc_object(Object::new(ObjectClass::Plain)))
                    }
                    _ => Err(Self::not_a_constructor(constructor, location)),
                }
            }
            _ => Err(Self::not_a_constructor(constructor, location)),
        }
    }

    /// `new Array(n)` makes `n` empty slots; any other argument list becomes the elements
    fn construct_array(
        &mut self,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if let [Value::Number(n)] = args.as_slice() {
            let n = *n;
            if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
                return Err(RuntimeError::range("Invalid array length", location));
            }
            let len = n as usize;
            self.check_collection_len(len, location)?;
            return Ok(self.alloc_array(vec![Value::Undefined; len]));
        }
        Ok(self.alloc_array(args))
    }

    fn not_a_constructor(name: &str, location: SourceLocation) -> RuntimeError {
        RuntimeError::type_error(format!("{} is not a constructor", name), location)
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::test_support::{run, run_err, run_with_limits};
    use crate::runner::limits::Limits;

    #[test]
    fn test_closures_capture_environment() {
        let src = "function counter() {\n  let count = 0;\n  return () => ++count;\n}\nconst next = counter();\nnext(); next();\nconsole.log(next());";
        assert_eq!(run(src), ["3"]);
    }

    #[test]
    fn test_recursion() {
        let src = "function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); }\nconsole.log(fib(15));";
        assert_eq!(run(src), ["610"]);
    }

    #[test]
    fn test_default_and_missing_params() {
        let src = "function greet(name = 'friend', punct) { return 'Hi ' + name + punct; }\nconsole.log(greet(), greet('Ada', '!'));";
        assert_eq!(run(src), ["Hi friendundefined Hi Ada!"]);
    }

    #[test]
    fn test_method_this_binding() {
        let src = "const user = {\n  name: 'Ada',\n  hello() { return 'I am ' + this.name; },\n  later() { return [1].map(() => this.name)[0]; }\n};\nconsole.log(user.hello(), user.later());";
        assert_eq!(run(src), ["I am Ada Ada"]);
    }

    #[test]
    fn test_calling_non_function() {
        assert_eq!(
            run_err("const o = {};\no.missing();"),
            "TypeError: o.missing is not a function"
        );
    }

    #[test]
    fn test_unbounded_recursion_is_range_error() {
        let limits = Limits::default().with_max_call_depth(50);
        let (result, _) = run_with_limits("function f() { return f(); }\nf();", limits);
        assert_eq!(result.unwrap_err(), "RangeError: Maximum call stack size exceeded");
    }

    #[test]
    fn test_stack_overflow_is_catchable() {
        let src = "function f() { return f(); }\ntry { f(); } catch (e) { console.log(e.name); }\nconsole.log('after');";
        assert_eq!(run(src), ["RangeError", "after"]);
    }

    #[test]
    fn test_new_with_user_constructor() {
        let src = "function Point(x, y) { this.x = x; this.y = y; }\nconst p = new Point(1, 2);\nconsole.log(p.x + p.y);";
        assert_eq!(run(src), ["3"]);
    }

    #[test]
    fn test_new_builtins() {
        let src = "const e = new RangeError('too big');\nconst a = new Array(3);\nconst o = new Object();\nconsole.log(String(e), a.length, String(a), typeof o);";
        assert_eq!(run(src), ["RangeError: too big 3 ,, object"]);
    }

    #[test]
    fn test_new_on_non_constructor() {
        assert_eq!(
            run_err("const f = () => 1;\nnew f();"),
            "TypeError: f is not a constructor"
        );
    }

    #[test]
    fn test_function_name_and_length() {
        let src = "function add(a, b = 1) { return a + b; }\nconsole.log(add.name, add.length, String(add));";
        assert_eq!(run(src), ["add 1 function add() { [code] }"]);
    }
}
