//! `return`, `switch`, `throw` and `try` execution
//!
//! Exceptions travel as `Err(RuntimeError)` through the ordinary `?` chain.
//! `try` is the only place they are intercepted: the interpreter state that an
//! unwinding error leaves behind (current scope, `this`, call depth) is put
//! back to what it was when the `try` started before the handler runs.
//!
//! Host limits (step budget, timeout, cancellation, output cap) are not
//! catchable and skip `finally` blocks entirely.

use std::rc::Rc;

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::{Binding, BindingKind, ScopeRef};
use crate::memory::value::Value;
use crate::parser::ast::{AstNode, CaseNode, SourceLocation};

/// Interpreter state to restore when an exception is caught
struct Checkpoint {
    scope: ScopeRef,
    this: Value,
    call_depth: usize,
}

impl Interpreter<'_> {
    pub(crate) fn execute_return(&mut self, expr: Option<&AstNode>) -> Result<(), RuntimeError> {
        self.return_value = match expr {
            Some(ret_expr) => self.evaluate_expr(ret_expr)?,
            None => Value::Undefined,
        };
        self.control_flow = ControlFlow::Return;
        Ok(())
    }

    pub(crate) fn execute_throw(
        &mut self,
        expr: &AstNode,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let value = self.evaluate_expr(expr)?;
        Err(RuntimeError::Thrown { value, location })
    }

    /// `switch` compares with `===`, falls through until `break`, and shares
    /// one block scope across all cases
    pub(crate) fn execute_switch(
        &mut self,
        expr: &AstNode,
        cases: &[CaseNode],
    ) -> Result<(), RuntimeError> {
        let switch_val = self.evaluate_expr(expr)?;

        self.enter_scope();
        for case in cases {
            self.hoist_block(Self::case_statements(case))?;
        }

        let mut match_index: Option<usize> = None;
        let mut default_index: Option<usize> = None;

        for (i, case) in cases.iter().enumerate() {
            match case {
                CaseNode::Case { value, .. } => {
                    let case_val = self.evaluate_expr(value)?;
                    if switch_val.strict_equals(&case_val) {
                        match_index = Some(i);
                        break;
                    }
                }
                CaseNode::Default { .. } => {
                    default_index = Some(i);
                }
            }
        }

        if let Some(start) = match_index.or(default_index) {
            for case in &cases[start..] {
                self.execute_statements(Self::case_statements(case))?;

                match self.control_flow {
                    ControlFlow::Normal => {}
                    ControlFlow::Break => {
                        self.control_flow = ControlFlow::Normal;
                        break;
                    }
                    // continue and return belong to an outer construct
                    ControlFlow::Continue | ControlFlow::Return => break,
                }
            }
        }
        self.exit_scope();

        Ok(())
    }

    fn case_statements(case: &CaseNode) -> &[AstNode] {
        match case {
            CaseNode::Case { statements, .. } => statements,
            CaseNode::Default { statements, .. } => statements,
        }
    }

    pub(crate) fn execute_try(
        &mut self,
        block: &[AstNode],
        catch_param: Option<&str>,
        catch_block: Option<&[AstNode]>,
        finally_block: Option<&[AstNode]>,
    ) -> Result<(), RuntimeError> {
        let checkpoint = self.checkpoint();

        let mut outcome = self.execute_block(block);

        if let Some(catch_block) = catch_block {
            if let Err(err) = outcome {
                outcome = if err.is_catchable() {
                    self.restore(&checkpoint);
                    self.execute_catch(err, catch_param, catch_block)
                } else {
                    Err(err)
                };
            }
        }

        let Some(finally_block) = finally_block else {
            return outcome;
        };

        if let Err(err) = &outcome {
            if !err.is_catchable() {
                return outcome;
            }
            self.restore(&checkpoint);
        }

        let pending_flow = self.control_flow;
        let pending_return = std::mem::take(&mut self.return_value);
        self.control_flow = ControlFlow::Normal;

        self.execute_block(finally_block)?;

        if self.control_flow != ControlFlow::Normal {
            // An abrupt finally replaces whatever the try or catch was doing
            return Ok(());
        }
        self.control_flow = pending_flow;
        self.return_value = pending_return;
        outcome
    }

    fn execute_catch(
        &mut self,
        err: RuntimeError,
        catch_param: Option<&str>,
        catch_block: &[AstNode],
    ) -> Result<(), RuntimeError> {
        let location = err.location().copied().unwrap_or(self.current_location);
        let value = self.error_to_value(err);

        self.enter_scope();
        if let Some(param) = catch_param {
            self.declare(param, Binding::new(BindingKind::Let, value), location)?;
        }
        self.hoist_block(catch_block)?;
        self.execute_statements(catch_block)?;
        self.exit_scope();
        Ok(())
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            scope: Rc::clone(&self.scope),
            this: self.this.clone(),
            call_depth: self.call_depth,
        }
    }

    fn restore(&mut self, checkpoint: &Checkpoint) {
        self.scope = Rc::clone(&checkpoint.scope);
        self.this = checkpoint.this.clone();
        self.call_depth = checkpoint.call_depth;
        self.control_flow = ControlFlow::Normal;
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::test_support::{run, run_err};

    #[test]
    fn test_switch_fallthrough_and_default() {
        let src = "function grade(n) {\n  switch (n) {\n    case 1:\n    case 2: return 'low';\n    case 3: return 'mid';\n    default: return 'high';\n  }\n}\nconsole.log(grade(2), grade(3), grade(9));";
        assert_eq!(run(src), ["low mid high"]);
    }

    #[test]
    fn test_switch_uses_strict_equality() {
        let src = "switch ('1') { case 1: console.log('number'); break; case '1': console.log('string'); break; }";
        assert_eq!(run(src), ["string"]);
    }

    #[test]
    fn test_catch_thrown_error() {
        let src = "try {\n  throw new Error('Something went wrong');\n} catch (e) {\n  console.log(e.message);\n  console.log(String(e));\n}";
        assert_eq!(run(src), ["Something went wrong", "Error: Something went wrong"]);
    }

    #[test]
    fn test_catch_runtime_error() {
        let src = "try { missing(); } catch (e) { console.log(e.name + ': ' + e.message); }";
        assert_eq!(run(src), ["ReferenceError: missing is not defined"]);
    }

    #[test]
    fn test_finally_runs_and_preserves_return() {
        let src = "function f() {\n  try { return 'try'; } finally { console.log('cleanup'); }\n}\nconsole.log(f());";
        assert_eq!(run(src), ["cleanup", "try"]);
    }

    #[test]
    fn test_finally_return_overrides() {
        let src = "function f() {\n  try { throw 1; } finally { return 'finally'; }\n}\nconsole.log(f());";
        assert_eq!(run(src), ["finally"]);
    }

    #[test]
    fn test_rethrow_from_catch() {
        let src = "try { null.x; } catch (e) { throw new TypeError('wrapped: ' + e.message); }";
        assert_eq!(
            run_err(src),
            "TypeError: wrapped: Cannot read properties of null (reading 'x')"
        );
    }

    #[test]
    fn test_uncaught_primitive_throw() {
        assert_eq!(run_err("throw 'oops';"), "oops");
    }

    #[test]
    fn test_catch_restores_scope_after_deep_error() {
        let src = "function deep(n) { let local = n; if (n === 0) throw new Error('bottom'); return deep(n - 1); }\nlet x = 'outer';\ntry { deep(5); } catch (e) { console.log(x, e.message); }\nconsole.log(x);";
        assert_eq!(run(src), ["outer bottom", "outer"]);
    }
}
