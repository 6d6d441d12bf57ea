//! Interpreter core: state, scopes, hoisting and the execution budget
//!
//! [`Interpreter`] walks the AST directly. Its behaviour is split across
//! several files, each adding an `impl Interpreter` block:
//! - `statements`: declarations, blocks, `if`
//! - `loops`: `while`, `do-while`, `for`, `for-of`, `for-in`
//! - `jumps`: `return`, `switch`, `throw`, `try`
//! - `expressions`: operators, literals, assignment
//! - `functions`: calls, closures, `new`
//! - `builtins` / `methods`: the global library and value methods
//!
//! # Budget
//!
//! Every statement, loop iteration and call goes through [`Interpreter::tick`],
//! which counts steps and periodically checks the deadline and cancel token.
//! The interpreter owns no output stream; print-style calls are forwarded to the
//! injected [`OutputSink`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::interpreter::builtins::install_globals;
use crate::interpreter::constants::CLOCK_CHECK_INTERVAL;
use crate::interpreter::errors::RuntimeError;
use crate::memory::heap::Heap;
use crate::memory::scope::{function_scope, Binding, BindingKind, Scope, ScopeError, ScopeRef};
use crate::memory::value::{Closure, Object, ObjectClass, Value};
use crate::parser::ast::*;
use crate::runner::limits::{CancelToken, Limits};
use crate::runner::sink::OutputSink;

/// Non-local control flow signal left behind by the last statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return,
}

/// Tree-walking interpreter for one script run
pub struct Interpreter<'s> {
    /// Destination of `console.log` and friends
    sink: &'s mut dyn OutputSink,

    limits: Limits,
    cancel: CancelToken,
    started: Instant,
    deadline: Instant,

    /// Steps taken so far (statements, loop iterations and calls)
    steps: u64,
    pub(crate) call_depth: usize,
    lines_written: usize,

    /// Scope the next statement executes in
    pub(crate) scope: ScopeRef,
    /// Scope holding the built-in library; parent of the script's global scope
    realm: ScopeRef,

    /// `this` of the function currently executing
    pub(crate) this: Value,

    pub(crate) control_flow: ControlFlow,
    pub(crate) return_value: Value,

    /// Location of the statement or expression being evaluated
    pub(crate) current_location: SourceLocation,

    pub(crate) heap: Heap,
    pub(crate) rng: StdRng,
}

impl<'s> Interpreter<'s> {
    /// Create an interpreter that prints to `sink` and obeys `limits`
    pub fn new(sink: &'s mut dyn OutputSink, limits: Limits, cancel: CancelToken) -> Self {
        let mut heap = Heap::new();
        let realm = Scope::global();
        heap.track_scope(&realm);
        let global = Scope::child(&realm, true);
        heap.track_scope(&global);

        let now = Instant::now();
        let mut interpreter = Interpreter {
            sink,
            limits,
            cancel,
            started: now,
            deadline: now + limits.timeout,
            steps: 0,
            call_depth: 0,
            lines_written: 0,
            scope: global,
            realm,
            this: Value::Undefined,
            control_flow: ControlFlow::Normal,
            return_value: Value::Undefined,
            current_location: SourceLocation::new(1, 1),
            heap,
            rng: StdRng::from_os_rng(),
        };
        install_globals(&mut interpreter);
        interpreter
    }

    /// Use a fixed seed for `Math.random`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Execute a parsed program from the top
    pub fn execute(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.started = Instant::now();
        self.deadline = self.started + self.limits.timeout;

        let global = Rc::clone(&self.scope);
        self.hoist_vars(&program.nodes, &global)?;
        self.hoist_block(&program.nodes)?;

        for stmt in &program.nodes {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                return Err(self.illegal_jump());
            }
        }

        debug!(
            "script finished: {} steps, {} lines, {} allocations",
            self.steps,
            self.lines_written,
            self.heap.total_allocations()
        );
        Ok(())
    }

    /// Error for a `break`, `continue` or `return` that escaped every construct
    /// able to handle it
    pub(crate) fn illegal_jump(&mut self) -> RuntimeError {
        let keyword = match self.control_flow {
            ControlFlow::Break => "break",
            ControlFlow::Continue => "continue",
            ControlFlow::Return | ControlFlow::Normal => "return",
        };
        self.control_flow = ControlFlow::Normal;
        RuntimeError::Syntax {
            message: format!("Illegal {} statement", keyword),
            location: self.current_location,
        }
    }

    /// Count one step and enforce the budget
    pub(crate) fn tick(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(RuntimeError::StepLimitExceeded {
                limit: self.limits.max_steps,
            });
        }
        if self.steps % CLOCK_CHECK_INTERVAL == 0 {
            self.check_interrupts()?;
        }
        Ok(())
    }

    /// Check the cancel token and the deadline
    pub(crate) fn check_interrupts(&self) -> Result<(), RuntimeError> {
        if self.cancel.is_cancelled() {
            return Err(RuntimeError::Cancelled);
        }
        if Instant::now() >= self.deadline {
            return Err(RuntimeError::Timeout {
                limit_ms: self.limits.timeout_ms(),
            });
        }
        Ok(())
    }

    /// Forward one line to the sink, enforcing the output cap
    pub(crate) fn print_line(&mut self, line: &str) -> Result<(), RuntimeError> {
        if self.lines_written >= self.limits.max_output_lines {
            return Err(RuntimeError::OutputLimitExceeded {
                limit: self.limits.max_output_lines,
            });
        }
        self.lines_written += 1;
        self.sink.write_line(line);
        Ok(())
    }

    // ===== Scopes =====

    /// Enter a new block scope
    pub(crate) fn enter_scope(&mut self) {
        let scope = Scope::child(&self.scope, false);
        self.heap.track_scope(&scope);
        self.scope = scope;
    }

    /// Exit the current block scope
    pub(crate) fn exit_scope(&mut self) {
        let parent = self.scope.borrow().parent();
        if let Some(parent) = parent {
            self.scope = parent;
        }
    }

    /// Create a function scope below `parent` without entering it
    pub(crate) fn new_function_scope(&mut self, parent: &ScopeRef) -> ScopeRef {
        let scope = Scope::child(parent, true);
        self.heap.track_scope(&scope);
        scope
    }

    /// Declare a binding in the current scope
    pub(crate) fn declare(
        &mut self,
        name: &str,
        binding: Binding,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let result = self.scope.borrow_mut().declare(name, binding);
        result.map_err(|_| RuntimeError::Syntax {
            message: format!("Identifier '{}' has already been declared", name),
            location,
        })
    }

    /// Read a variable through the scope chain
    pub(crate) fn lookup_variable(
        &self,
        name: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        crate::memory::scope::lookup(&self.scope, name)
            .map_err(|err| Self::scope_error(err, name, location))
    }

    /// Assign to an existing variable through the scope chain
    pub(crate) fn assign_variable(
        &mut self,
        name: &str,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        crate::memory::scope::assign(&self.scope, name, value)
            .map_err(|err| Self::scope_error(err, name, location))
    }

    pub(crate) fn scope_error(err: ScopeError, name: &str, location: SourceLocation) -> RuntimeError {
        match err {
            ScopeError::NotDefined => {
                RuntimeError::reference(format!("{} is not defined", name), location)
            }
            ScopeError::Uninitialized => RuntimeError::reference(
                format!("Cannot access '{}' before initialization", name),
                location,
            ),
            ScopeError::ConstAssignment => {
                RuntimeError::type_error("Assignment to constant variable.", location)
            }
            ScopeError::AlreadyDeclared => RuntimeError::Syntax {
                message: format!("Identifier '{}' has already been declared", name),
                location,
            },
        }
    }

    // ===== Hoisting =====

    /// Hoist the lexical declarations of a block: `let`/`const` enter their
    /// temporal dead zone and function declarations become callable
    pub(crate) fn hoist_block(&mut self, statements: &[AstNode]) -> Result<(), RuntimeError> {
        for stmt in statements {
            match stmt {
                AstNode::VarDecl {
                    kind: kind @ (DeclKind::Let | DeclKind::Const),
                    declarators,
                    ..
                } => {
                    for decl in declarators {
                        self.declare(
                            &decl.name,
                            Binding::uninitialized(BindingKind::from(*kind)),
                            decl.location,
                        )?;
                    }
                }
                AstNode::FunctionDecl { func, location } => {
                    let closure = self.make_closure(func);
                    let name = func.name.as_deref().unwrap_or_default();
                    self.declare(name, Binding::new(BindingKind::Function, closure), *location)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Hoist `var` declarations found anywhere in a function body (but not in
    /// nested functions) into `target`, initialized to `undefined`
    pub(crate) fn hoist_vars(
        &mut self,
        statements: &[AstNode],
        target: &ScopeRef,
    ) -> Result<(), RuntimeError> {
        for stmt in statements {
            self.hoist_vars_in(stmt, target)?;
        }
        Ok(())
    }

    fn hoist_vars_in(&mut self, stmt: &AstNode, target: &ScopeRef) -> Result<(), RuntimeError> {
        let declare_var = |name: &str, location: SourceLocation| {
            target
                .borrow_mut()
                .declare(name, Binding::new(BindingKind::Var, Value::Undefined))
                .map_err(|err| Self::scope_error(err, name, location))
        };

        match stmt {
            AstNode::VarDecl {
                kind: DeclKind::Var,
                declarators,
                ..
            } => {
                for decl in declarators {
                    declare_var(&decl.name, decl.location)?;
                }
            }
            AstNode::ForOf {
                kind: Some(DeclKind::Var),
                name,
                body,
                location,
                ..
            }
            | AstNode::ForIn {
                kind: Some(DeclKind::Var),
                name,
                body,
                location,
                ..
            } => {
                declare_var(name, *location)?;
                self.hoist_vars(body, target)?;
            }
            AstNode::ForOf { body, .. }
            | AstNode::ForIn { body, .. }
            | AstNode::While { body, .. }
            | AstNode::DoWhile { body, .. } => self.hoist_vars(body, target)?,
            AstNode::For { init, body, .. } => {
                if let Some(init) = init {
                    self.hoist_vars_in(init, target)?;
                }
                self.hoist_vars(body, target)?;
            }
            AstNode::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.hoist_vars(then_branch, target)?;
                if let Some(else_branch) = else_branch {
                    self.hoist_vars(else_branch, target)?;
                }
            }
            AstNode::Block { statements, .. } => self.hoist_vars(statements, target)?,
            AstNode::Try {
                block,
                catch_block,
                finally_block,
                ..
            } => {
                self.hoist_vars(block, target)?;
                if let Some(catch_block) = catch_block {
                    self.hoist_vars(catch_block, target)?;
                }
                if let Some(finally_block) = finally_block {
                    self.hoist_vars(finally_block, target)?;
                }
            }
            AstNode::Switch { cases, .. } => {
                for case in cases {
                    let statements = match case {
                        CaseNode::Case { statements, .. } => statements,
                        CaseNode::Default { statements, .. } => statements,
                    };
                    self.hoist_vars(statements, target)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Function scope that `var` declarations in the current scope belong to
    pub(crate) fn var_scope(&self) -> ScopeRef {
        function_scope(&self.scope)
    }

    // ===== Allocation =====

    pub(crate) fn alloc_array(&mut self, items: Vec<Value>) -> Value {
        let array = Rc::new(RefCell::new(items));
        self.heap.track_array(&array);
        Value::Array(array)
    }

    pub(crate) fn alloc_object(&mut self, object: Object) -> Value {
        let object = Rc::new(RefCell::new(object));
        self.heap.track_object(&object);
        Value::Object(object)
    }

    pub(crate) fn alloc_error(&mut self, name: &str, message: &str) -> Value {
        let mut object = Object::new(ObjectClass::Error);
        object.set("name", Value::from(name));
        object.set("message", Value::from(message));
        self.alloc_object(object)
    }

    /// Value a `catch` clause receives for `err`
    pub(crate) fn error_to_value(&mut self, err: RuntimeError) -> Value {
        match err {
            RuntimeError::Thrown { value, .. } => value,
            other => {
                let (name, message) = other.name_and_message();
                self.alloc_error(name, &message)
            }
        }
    }

    /// Capture the current scope in a new closure
    pub(crate) fn make_closure(&mut self, def: &Rc<FunctionDef>) -> Value {
        let lexical_this = if def.is_arrow {
            Some(self.this.clone())
        } else {
            None
        };
        Value::Function(Rc::new(Closure {
            def: Rc::clone(def),
            env: Rc::clone(&self.scope),
            lexical_this,
        }))
    }

    /// Reject collections that would exceed the configured maximum length
    /// Strings are measured in chars, the unit `length` reports
    pub(crate) fn check_string_len(
        &self,
        text: &str,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        // A string never has more chars than bytes
        if text.len() <= self.limits.max_collection_len {
            return Ok(());
        }
        self.check_collection_len(text.chars().count(), location)
    }

    pub(crate) fn check_collection_len(
        &self,
        len: usize,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        if len > self.limits.max_collection_len {
            return Err(RuntimeError::range(
                format!(
                    "Invalid length {}: collections are limited to {} elements",
                    len, self.limits.max_collection_len
                ),
                location,
            ));
        }
        Ok(())
    }

    pub(crate) fn realm(&self) -> &ScopeRef {
        &self.realm
    }

    // ===== Accessors =====

    /// Steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Time since execution started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Lines written to the sink so far
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }
}

impl Drop for Interpreter<'_> {
    /// Empty the heap before the scope fields drop, so dropping the script's
    /// bindings never walks a deeply nested value recursively
    fn drop(&mut self) {
        self.heap.teardown();
    }
}
