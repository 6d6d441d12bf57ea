//! Statement execution implementation
//!
//! This module dispatches every statement kind and implements the simple ones:
//!
//! - Variable declarations (`let`, `const`, `var`)
//! - Function declarations (already hoisted, so executing one is a no-op)
//! - Blocks, `if`/`else` and expression statements
//!
//! Loops live in `loops`, jumps (`return`, `switch`, `throw`, `try`) in `jumps`.
//!
//! # Control Flow
//!
//! A statement that breaks the normal sequence sets `control_flow`; every
//! statement list checks it after each statement and stops early, leaving the
//! enclosing construct to consume the signal.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::*;

impl Interpreter<'_> {
    pub(crate) fn execute_statement(&mut self, stmt: &AstNode) -> Result<(), RuntimeError> {
        self.current_location = stmt.location();
        self.tick()?;

        match stmt {
            AstNode::VarDecl {
                kind, declarators, ..
            } => self.execute_var_decl(*kind, declarators),

            // Hoisted when the enclosing block was entered
            AstNode::FunctionDecl { .. } => Ok(()),

            AstNode::Return { expr, .. } => self.execute_return(expr.as_deref()),

            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => self.execute_if(condition, then_branch, else_branch.as_deref()),

            AstNode::While {
                condition, body, ..
            } => self.execute_while(condition, body),

            AstNode::DoWhile {
                body, condition, ..
            } => self.execute_do_while(body, condition),

            AstNode::For {
                init,
                condition,
                increment,
                body,
                ..
            } => self.execute_for(
                init.as_deref(),
                condition.as_deref(),
                increment.as_deref(),
                body,
            ),

            AstNode::ForOf {
                kind,
                name,
                iterable,
                body,
                location,
            } => self.execute_for_of(*kind, name, iterable, body, *location),

            AstNode::ForIn {
                kind,
                name,
                object,
                body,
                location,
            } => self.execute_for_in(*kind, name, object, body, *location),

            AstNode::Switch { expr, cases, .. } => self.execute_switch(expr, cases),

            AstNode::Break { .. } => {
                self.control_flow = ControlFlow::Break;
                Ok(())
            }

            AstNode::Continue { .. } => {
                self.control_flow = ControlFlow::Continue;
                Ok(())
            }

            AstNode::Throw { expr, location } => self.execute_throw(expr, *location),

            AstNode::Try {
                block,
                catch_param,
                catch_block,
                finally_block,
                ..
            } => self.execute_try(
                block,
                catch_param.as_deref(),
                catch_block.as_deref(),
                finally_block.as_deref(),
            ),

            AstNode::Block { statements, .. } => self.execute_block(statements),

            AstNode::ExpressionStatement { expr, .. } => {
                self.evaluate_expr(expr)?;
                Ok(())
            }

            AstNode::Empty { .. } => Ok(()),

            // Bare expressions never reach here; the parser wraps them
            other => {
                self.evaluate_expr(other)?;
                Ok(())
            }
        }
    }

    /// Execute statements in order, stopping at the first control-flow signal
    pub(crate) fn execute_statements(&mut self, statements: &[AstNode]) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                break;
            }
        }
        Ok(())
    }

    /// Execute a braced block in its own scope
    pub(crate) fn execute_block(&mut self, statements: &[AstNode]) -> Result<(), RuntimeError> {
        self.enter_scope();
        self.hoist_block(statements)?;
        self.execute_statements(statements)?;
        self.exit_scope();
        Ok(())
    }

    pub(crate) fn execute_var_decl(
        &mut self,
        kind: DeclKind,
        declarators: &[Declarator],
    ) -> Result<(), RuntimeError> {
        for decl in declarators {
            let value = match &decl.init {
                Some(init) => self.evaluate_expr(init)?,
                None => Value::Undefined,
            };

            match kind {
                DeclKind::Var => {
                    // `var x;` without an initializer leaves the hoisted value alone
                    if decl.init.is_some() {
                        let scope = self.var_scope();
                        crate::memory::scope::assign(&scope, &decl.name, value)
                            .map_err(|err| Self::scope_error(err, &decl.name, decl.location))?;
                    }
                }
                DeclKind::Let | DeclKind::Const => {
                    self.scope.borrow_mut().initialize(&decl.name, value);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn execute_if(
        &mut self,
        condition: &AstNode,
        then_branch: &[AstNode],
        else_branch: Option<&[AstNode]>,
    ) -> Result<(), RuntimeError> {
        let cond = self.evaluate_expr(condition)?;
        if cond.is_truthy() {
            self.execute_block(then_branch)
        } else if let Some(else_branch) = else_branch {
            self.execute_block(else_branch)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::test_support::{run, run_err};

    #[test]
    fn test_block_scoping() {
        let out = run("let x = 1;\n{ let x = 2; console.log(x); }\nconsole.log(x);");
        assert_eq!(out, ["2", "1"]);
    }

    #[test]
    fn test_var_is_function_scoped() {
        let out = run("if (true) { var v = 'in'; }\nconsole.log(v);\nvar v;\nconsole.log(v);");
        assert_eq!(out, ["in", "in"]);
    }

    #[test]
    fn test_var_hoisting_reads_undefined() {
        assert_eq!(run("console.log(h); var h = 3;"), ["undefined"]);
    }

    #[test]
    fn test_let_without_initializer() {
        assert_eq!(run("let a; console.log(a);"), ["undefined"]);
    }

    #[test]
    fn test_const_reassignment() {
        assert_eq!(
            run_err("const c = 1; c = 2;"),
            "TypeError: Assignment to constant variable."
        );
    }

    #[test]
    fn test_duplicate_let() {
        assert_eq!(
            run_err("let d = 1;\nlet d = 2;"),
            "SyntaxError: Identifier 'd' has already been declared (line 2, column 5)"
        );
    }

    #[test]
    fn test_if_else_chain() {
        let src = "let n = 7;\nif (n < 5) console.log('small');\nelse if (n < 10) console.log('medium');\nelse console.log('large');";
        assert_eq!(run(src), ["medium"]);
    }

    #[test]
    fn test_break_outside_loop() {
        assert_eq!(
            run_err("console.log(1);\nbreak;"),
            "SyntaxError: Illegal break statement (line 2, column 1)"
        );
    }
}
