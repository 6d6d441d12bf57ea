//! Sandboxed script runner
//!
//! [`CodeRunner`] turns script text into an [`ExecutionResult`]:
//! - every print-style call becomes one captured line
//! - a run that prints nothing yields the [`NO_OUTPUT_SENTINEL`] line
//! - any fault (syntax, runtime, thrown value, exhausted limit) yields
//!   `Failure("Error: " + String(fault))`
//!
//! Each run gets its own [`CaptureSink`] and interpreter, so a failing run
//! cannot leave anything behind for the next one. Runs execute on a dedicated
//! thread with a large stack; [`CodeRunner::spawn`] returns a [`RunHandle`]
//! for callers that must stay responsive while the script runs.

pub mod limits;
pub mod sink;
pub mod worker;

use std::time::{Duration, Instant};

use log::{debug, error, warn};

use crate::interpreter::constants::RUNNER_STACK_SIZE;
use crate::interpreter::{Interpreter, RuntimeError};
use crate::parser::Parser;
use limits::{CancelToken, Limits};
use sink::CaptureSink;
pub use worker::RunHandle;

/// The single line reported when a script runs cleanly without printing
pub const NO_OUTPUT_SENTINEL: &str = "Code executed successfully (no output)";

/// Message used when the worker thread dies without reporting
pub(crate) const WORKER_DIED: &str = "Error: InternalError: runner thread terminated unexpectedly";

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Captured lines in call order; never empty
    Output(Vec<String>),
    /// `"Error: "` followed by the fault's string form
    Failure(String),
}

impl ExecutionResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionResult::Failure(_))
    }

    /// Whether this is the synthetic line for a run that printed nothing.
    /// A script that itself prints the sentinel text is indistinguishable.
    pub fn is_no_output_sentinel(&self) -> bool {
        matches!(self, ExecutionResult::Output(lines) if lines.len() == 1 && lines[0] == NO_OUTPUT_SENTINEL)
    }

    /// Text shown in the output pane
    pub fn text(&self) -> String {
        match self {
            ExecutionResult::Output(lines) => lines.join("\n"),
            ExecutionResult::Failure(message) => message.clone(),
        }
    }

    fn from_lines(lines: Vec<String>) -> Self {
        if lines.is_empty() {
            ExecutionResult::Output(vec![NO_OUTPUT_SENTINEL.to_string()])
        } else {
            ExecutionResult::Output(lines)
        }
    }

    fn from_fault(fault: &impl std::fmt::Display) -> Self {
        ExecutionResult::Failure(format!("Error: {}", fault))
    }
}

/// A result plus what the run cost
#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: ExecutionResult,
    pub steps: u64,
    pub elapsed: Duration,
    /// Line the fault was raised on, when there is one
    pub fault_line: Option<usize>,
}

impl RunReport {
    pub(crate) fn internal_failure(message: &str, elapsed: Duration) -> Self {
        RunReport {
            result: ExecutionResult::Failure(message.to_string()),
            steps: 0,
            elapsed,
            fault_line: None,
        }
    }
}

/// Executes scripts under a fixed set of limits
#[derive(Debug, Clone, Default)]
pub struct CodeRunner {
    limits: Limits,
}

impl CodeRunner {
    pub fn new(limits: Limits) -> Self {
        CodeRunner { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Run `source` to completion and return its result
    pub fn run(&self, source: &str) -> ExecutionResult {
        self.run_report(source).result
    }

    /// Run `source` to completion, blocking the caller
    pub fn run_report(&self, source: &str) -> RunReport {
        self.run_with_cancel(source, CancelToken::new())
    }

    /// Like [`CodeRunner::run_report`], stoppable through `cancel`
    pub fn run_with_cancel(&self, source: &str, cancel: CancelToken) -> RunReport {
        let started = Instant::now();
        let source = source.to_string();
        let limits = self.limits;

        let worker = std::thread::Builder::new()
            .name("codemaster-run".to_string())
            .stack_size(RUNNER_STACK_SIZE)
            .spawn(move || execute_in_place(&source, limits, cancel));

        match worker.map(|handle| handle.join()) {
            Ok(Ok(report)) => report,
            Ok(Err(_)) | Err(_) => {
                error!("runner thread terminated unexpectedly");
                RunReport::internal_failure(WORKER_DIED, started.elapsed())
            }
        }
    }

    /// Start `source` on a worker thread and return immediately
    pub fn spawn(&self, source: &str) -> RunHandle {
        RunHandle::spawn(source.to_string(), self.limits)
    }
}

/// Parse and execute `source` on the current thread.
///
/// Deep recursion in the script recurses in the interpreter too, so callers
/// should run this on a thread with a large stack.
pub fn execute_in_place(source: &str, limits: Limits, cancel: CancelToken) -> RunReport {
    let started = Instant::now();
    debug!(
        "run started: {} bytes, {} steps / {} ms budget",
        source.len(),
        limits.max_steps,
        limits.timeout_ms()
    );

    let program = match Parser::new(source).and_then(|mut parser| parser.parse_program()) {
        Ok(program) => program,
        Err(err) => {
            debug!("run rejected: {}", err);
            return RunReport {
                result: ExecutionResult::from_fault(&err),
                steps: 0,
                elapsed: started.elapsed(),
                fault_line: Some(err.location.line),
            };
        }
    };

    let mut sink = CaptureSink::new();
    // Render the fault before heap teardown empties thrown error objects
    let (failure, steps, fault_line) = {
        let mut interpreter = Interpreter::new(&mut sink, limits, cancel);
        let (failure, fault_line) = match interpreter.execute(&program) {
            Ok(()) => (None, None),
            Err(err) => {
                log_fault(&err);
                let line = err
                    .location()
                    .map(|loc| loc.line)
                    .unwrap_or(interpreter.current_location().line);
                (Some(ExecutionResult::from_fault(&err)), Some(line))
            }
        };
        (failure, interpreter.steps(), fault_line)
    };

    let result = failure.unwrap_or_else(|| ExecutionResult::from_lines(sink.into_lines()));

    let elapsed = started.elapsed();
    debug!("run finished in {:?} after {} steps", elapsed, steps);
    RunReport {
        result,
        steps,
        elapsed,
        fault_line,
    }
}

fn log_fault(err: &RuntimeError) {
    if err.is_limit() {
        warn!("run stopped by limit: {}", err);
    } else {
        debug!("run failed: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_lines() {
        let runner = CodeRunner::default();
        assert_eq!(
            runner.run("console.log('a');\nconsole.log('b', 2);"),
            ExecutionResult::Output(vec!["a".into(), "b 2".into()])
        );
    }

    #[test]
    fn test_sentinel_for_silent_script() {
        let result = CodeRunner::default().run("let x = 1 + 1;");
        assert!(result.is_no_output_sentinel());
        assert_eq!(result.text(), NO_OUTPUT_SENTINEL);
    }

    #[test]
    fn test_syntax_error_failure() {
        let report = CodeRunner::default().run_report("let = 5;");
        assert!(report.result.is_failure());
        assert!(report.result.text().starts_with("Error: SyntaxError:"));
        assert_eq!(report.fault_line, Some(1));
    }

    #[test]
    fn test_report_counts_steps() {
        let report = CodeRunner::default().run_report("for (let i = 0; i < 10; i++) {}");
        assert!(report.steps >= 10);
        assert_eq!(report.fault_line, None);
    }

    #[test]
    fn test_fault_line_points_at_error() {
        let report = CodeRunner::default().run_report("let a = 1;\nlet b = 2;\nmissing();");
        assert_eq!(report.fault_line, Some(3));
        assert_eq!(
            report.result.text(),
            "Error: ReferenceError: missing is not defined"
        );
    }

    #[test]
    fn test_uncaught_error_object_keeps_message() {
        let runner = CodeRunner::default();
        assert_eq!(
            runner.run("throw new TypeError('bad')"),
            ExecutionResult::Failure("Error: TypeError: bad".into())
        );
        assert_eq!(
            runner.run("function f() { throw new Error('in f') }\nf()"),
            ExecutionResult::Failure("Error: Error: in f".into())
        );
        assert_eq!(
            runner.run("throw 'plain'"),
            ExecutionResult::Failure("Error: plain".into())
        );
    }

    #[test]
    fn test_thrown_error_reports_its_line() {
        let report = CodeRunner::default().run_report("let a = 1;\nthrow new RangeError('out');");
        assert_eq!(report.result.text(), "Error: RangeError: out");
        assert_eq!(report.fault_line, Some(2));
    }
}
