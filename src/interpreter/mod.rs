//! LearnScript interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: interpreter state, scopes, hoisting and the execution budget
//! - [`errors`]: runtime error types
//! - [`constants`]: default limits
//!
//! # Execution Model
//!
//! The interpreter walks the AST and executes statements one at a time,
//! counting a step for every statement, loop iteration and call. Exceptions
//! unwind as `Err(RuntimeError)` until a `try` catches them or they reach the
//! runner.
//!
//! # Built-in Functions
//!
//! The global library (`console`, `Math`, `JSON`, ...) and the methods on
//! arrays, strings and numbers are native functions implemented in
//! `builtins` and `methods` rather than in script code.

mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
mod functions;
mod jumps;
mod loops;
mod methods;
mod statements;

pub use engine::Interpreter;
pub use errors::RuntimeError;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::interpreter::constants::RUNNER_STACK_SIZE;
    use crate::interpreter::Interpreter;
    use crate::parser::parse::Parser;
    use crate::runner::limits::{CancelToken, Limits};
    use crate::runner::sink::CaptureSink;

    /// Run `source` on a large-stack thread; the error is rendered with `Display`
    pub(crate) fn run_with_limits(source: &str, limits: Limits) -> (Result<(), String>, Vec<String>) {
        let source = source.to_string();
        std::thread::Builder::new()
            .stack_size(RUNNER_STACK_SIZE)
            .spawn(move || {
                let mut sink = CaptureSink::new();
                let result = match Parser::new(&source).and_then(|mut p| p.parse_program()) {
                    Ok(program) => {
                        let mut interp = Interpreter::new(&mut sink, limits, CancelToken::new())
                            .with_seed(7);
                        interp.execute(&program).map_err(|e| e.to_string())
                    }
                    Err(e) => Err(e.to_string()),
                };
                (result, sink.into_lines())
            })
            .unwrap()
            .join()
            .unwrap()
    }

    /// Output of a script that must succeed
    pub(crate) fn run(source: &str) -> Vec<String> {
        let (result, lines) = run_with_limits(source, Limits::default());
        if let Err(err) = result {
            panic!("script failed: {}\noutput so far: {:?}", err, lines);
        }
        lines
    }

    /// Error text of a script that must fail
    pub(crate) fn run_err(source: &str) -> String {
        let (result, _) = run_with_limits(source, Limits::default());
        match result {
            Ok(()) => panic!("script succeeded but an error was expected"),
            Err(err) => err,
        }
    }
}
