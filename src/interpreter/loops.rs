//! Loop statement execution (`while`, `do-while`, `for`, `for-of`, `for-in`).
//!
//! Adds `impl Interpreter` methods for the loop forms. `break` and `continue`
//! are propagated via `LoopBodyResult` so the loop driver can react without
//! inspecting `control_flow` directly.
//!
//! `return` inside a loop body is handled by returning `LoopBodyResult::Exit`,
//! which causes the loop to unwind immediately and let the enclosing function
//! consume the signal.
//!
//! Every iteration gets a fresh body scope, so closures created inside a loop
//! body see that iteration's bindings. `for (let ...)` additionally copies the
//! loop variables into a new scope before each increment.

use std::rc::Rc;

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::{Binding, BindingKind, Scope};
use crate::memory::value::Value;
use crate::parser::ast::{AstNode, DeclKind, SourceLocation};

/// Result returned by [`Interpreter::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally or via `continue`; the loop should iterate again.
    Continue,
    /// `break` was encountered; the loop should exit cleanly.
    Break,
    /// `return` was triggered; the loop driver should unwind and leave
    /// `self.control_flow` for the caller.
    Exit,
}

/// Loop variable bound at the start of each `for-of`/`for-in` iteration
pub(crate) struct IterationBinding<'a> {
    pub kind: Option<DeclKind>,
    pub name: &'a str,
    pub value: Value,
    pub location: SourceLocation,
}

impl Interpreter<'_> {
    /// Executes all statements in `body` inside a fresh scope.
    ///
    /// Returns [`LoopBodyResult::Continue`] if the body ran to completion or hit
    /// `continue`, [`LoopBodyResult::Break`] on `break`, and
    /// [`LoopBodyResult::Exit`] on `return`.
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &[AstNode],
        binding: Option<IterationBinding<'_>>,
    ) -> Result<LoopBodyResult, RuntimeError> {
        self.tick()?;
        self.enter_scope();

        if let Some(binding) = binding {
            match binding.kind {
                Some(kind @ (DeclKind::Let | DeclKind::Const)) => self.declare(
                    binding.name,
                    Binding::new(BindingKind::from(kind), binding.value),
                    binding.location,
                )?,
                Some(DeclKind::Var) | None => {
                    self.assign_variable(binding.name, binding.value, binding.location)?
                }
            }
        }

        self.hoist_block(body)?;
        self.execute_statements(body)?;
        self.exit_scope();

        let result = match self.control_flow {
            ControlFlow::Normal => LoopBodyResult::Continue,
            ControlFlow::Continue => {
                self.control_flow = ControlFlow::Normal;
                LoopBodyResult::Continue
            }
            ControlFlow::Break => {
                self.control_flow = ControlFlow::Normal;
                LoopBodyResult::Break
            }
            ControlFlow::Return => LoopBodyResult::Exit,
        };
        Ok(result)
    }

    /// Executes a `while (condition) { body }` loop.
    pub(crate) fn execute_while(
        &mut self,
        condition: &AstNode,
        body: &[AstNode],
    ) -> Result<(), RuntimeError> {
        loop {
            let cond = self.evaluate_expr(condition)?;
            if !cond.is_truthy() {
                break;
            }

            match self.execute_loop_body(body, None)? {
                LoopBodyResult::Exit | LoopBodyResult::Break => break,
                LoopBodyResult::Continue => continue,
            }
        }
        Ok(())
    }

    /// Executes a `do { body } while (condition)` loop.
    ///
    /// The body always runs at least once; the condition is checked after each
    /// iteration.
    pub(crate) fn execute_do_while(
        &mut self,
        body: &[AstNode],
        condition: &AstNode,
    ) -> Result<(), RuntimeError> {
        loop {
            match self.execute_loop_body(body, None)? {
                LoopBodyResult::Exit | LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }

            let cond = self.evaluate_expr(condition)?;
            if !cond.is_truthy() {
                break;
            }
        }
        Ok(())
    }

    /// Executes a `for (init; condition; increment) { body }` loop.
    ///
    /// `init`, `condition`, and `increment` are all optional. A missing
    /// condition is treated as always-true. The initializer gets its own scope
    /// that is exited when the loop ends.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&AstNode>,
        condition: Option<&AstNode>,
        increment: Option<&AstNode>,
        body: &[AstNode],
    ) -> Result<(), RuntimeError> {
        self.enter_scope(); // Scope for init and loop variable

        let per_iteration = matches!(
            init,
            Some(AstNode::VarDecl {
                kind: DeclKind::Let | DeclKind::Const,
                ..
            })
        );

        if let Some(init_stmt) = init {
            self.hoist_block(std::slice::from_ref(init_stmt))?;
            self.execute_statement(init_stmt)?;
        }

        loop {
            if let Some(cond) = condition {
                let cond = self.evaluate_expr(cond)?;
                if !cond.is_truthy() {
                    break;
                }
            }

            match self.execute_loop_body(body, None)? {
                LoopBodyResult::Exit | LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }

            if per_iteration {
                self.copy_iteration_scope();
            }

            if let Some(inc) = increment {
                self.evaluate_expr(inc)?;
            }
        }
        self.exit_scope(); // Exit loop scope

        Ok(())
    }

    /// Replace the loop scope with a copy so closures from the previous
    /// iteration keep that iteration's values
    fn copy_iteration_scope(&mut self) {
        let (parent, bindings) = {
            let scope = self.scope.borrow();
            (scope.parent(), scope.bindings())
        };
        let Some(parent) = parent else {
            return;
        };
        let next = Scope::child(&parent, false);
        {
            let mut next_scope = next.borrow_mut();
            for (name, binding) in bindings {
                // Fresh scope, so this cannot collide
                let _ = next_scope.declare(&name, binding);
            }
        }
        self.heap.track_scope(&next);
        self.scope = next;
    }

    /// Executes `for (x of iterable) { body }` over an array or string.
    ///
    /// Arrays are walked by index against their live length, so elements
    /// pushed during the loop are visited too.
    pub(crate) fn execute_for_of(
        &mut self,
        kind: Option<DeclKind>,
        name: &str,
        iterable: &AstNode,
        body: &[AstNode],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let collection = self.evaluate_expr(iterable)?;

        match &collection {
            Value::Array(items) => {
                let items = Rc::clone(items);
                let mut index = 0;
                loop {
                    let item = match items.borrow().get(index) {
                        Some(item) => item.clone(),
                        None => break,
                    };
                    index += 1;
                    let binding = IterationBinding {
                        kind,
                        name,
                        value: item,
                        location,
                    };
                    match self.execute_loop_body(body, Some(binding))? {
                        LoopBodyResult::Exit | LoopBodyResult::Break => break,
                        LoopBodyResult::Continue => {}
                    }
                }
            }
            Value::String(text) => {
                let chars: Vec<char> = text.chars().collect();
                for ch in chars {
                    let binding = IterationBinding {
                        kind,
                        name,
                        value: Value::from(ch.to_string()),
                        location,
                    };
                    match self.execute_loop_body(body, Some(binding))? {
                        LoopBodyResult::Exit | LoopBodyResult::Break => break,
                        LoopBodyResult::Continue => {}
                    }
                }
            }
            _ => {
                return Err(RuntimeError::type_error(
                    format!("{} is not iterable", Self::expression_text(iterable)),
                    location,
                ));
            }
        }
        Ok(())
    }

    /// Executes `for (key in object) { body }`.
    ///
    /// Objects yield their own keys in insertion order, arrays and strings
    /// their indices as strings. The key list is fixed before the first
    /// iteration. `null` and `undefined` run zero iterations.
    pub(crate) fn execute_for_in(
        &mut self,
        kind: Option<DeclKind>,
        name: &str,
        object: &AstNode,
        body: &[AstNode],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let target = self.evaluate_expr(object)?;
        let keys: Vec<String> = match &target {
            Value::Object(obj) => obj.borrow().properties.keys().cloned().collect(),
            Value::Array(items) => (0..items.borrow().len()).map(|i| i.to_string()).collect(),
            Value::String(text) => (0..text.chars().count()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        };

        for key in keys {
            let binding = IterationBinding {
                kind,
                name,
                value: Value::from(key),
                location,
            };
            match self.execute_loop_body(body, Some(binding))? {
                LoopBodyResult::Exit | LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::test_support::{run, run_err};

    #[test]
    fn test_while_with_break_and_continue() {
        let src = "let i = 0;\nwhile (true) {\n  i++;\n  if (i % 2 === 0) continue;\n  if (i > 7) break;\n  console.log(i);\n}";
        assert_eq!(run(src), ["1", "3", "5", "7"]);
    }

    #[test]
    fn test_do_while_runs_once() {
        assert_eq!(run("let n = 10; do { console.log(n); } while (n < 5);"), ["10"]);
    }

    #[test]
    fn test_for_loop_sum() {
        let src = "let total = 0;\nfor (let i = 1; i <= 100; i++) { total += i; }\nconsole.log(total);";
        assert_eq!(run(src), ["5050"]);
    }

    #[test]
    fn test_for_let_captures_each_iteration() {
        let src = "const fns = [];\nfor (let i = 0; i < 3; i++) { fns.push(() => i); }\nconsole.log(fns.map(f => f()).join(','));";
        assert_eq!(run(src), ["0,1,2"]);
    }

    #[test]
    fn test_for_var_shares_binding() {
        let src = "const fns = [];\nfor (var i = 0; i < 3; i++) { fns.push(() => i); }\nconsole.log(fns.map(f => f()).join(','));";
        assert_eq!(run(src), ["3,3,3"]);
    }

    #[test]
    fn test_for_of_array_and_string() {
        let src = "for (const n of [1, 2]) console.log(n);\nfor (const c of 'hi') console.log(c);";
        assert_eq!(run(src), ["1", "2", "h", "i"]);
    }

    #[test]
    fn test_for_in_object_keys_in_order() {
        let src = "const o = { b: 1, a: 2 };\nfor (const k in o) console.log(k, o[k]);";
        assert_eq!(run(src), ["b 1", "a 2"]);
    }

    #[test]
    fn test_for_of_non_iterable() {
        assert_eq!(
            run_err("const o = {};\nfor (const x of o) {}"),
            "TypeError: o is not iterable"
        );
    }

    #[test]
    fn test_return_inside_loop() {
        let src = "function firstEven(xs) {\n  for (const x of xs) { if (x % 2 === 0) return x; }\n  return -1;\n}\nconsole.log(firstEven([3, 5, 8, 9]));";
        assert_eq!(run(src), ["8"]);
    }
}
