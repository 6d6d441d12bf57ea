//! Background runs
//!
//! A [`RunHandle`] owns one script executing on its own large-stack thread.
//! The dashboard polls it with [`RunHandle::try_result`] between frames; tests
//! and the headless CLI block on [`RunHandle::wait`]. The interpreter checks
//! its deadline every few hundred steps, but a single long native operation
//! can overrun it, so the handle enforces a hard deadline of its own.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use log::{debug, error, warn};

use crate::interpreter::constants::RUNNER_STACK_SIZE;
use crate::runner::limits::{CancelToken, Limits};
use crate::runner::{execute_in_place, RunReport, WORKER_DIED};

/// Slack granted past the run's own timeout before the handle gives up on it
pub const HARD_DEADLINE_GRACE: Duration = Duration::from_millis(500);

/// A run in progress
pub struct RunHandle {
    receiver: Receiver<RunReport>,
    cancel: CancelToken,
    started: Instant,
    hard_deadline: Duration,
    timeout_ms: u128,
}

impl RunHandle {
    pub(crate) fn spawn(source: String, limits: Limits) -> Self {
        let (sender, receiver) = mpsc::channel();
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        let spawned = std::thread::Builder::new()
            .name("codemaster-run".to_string())
            .stack_size(RUNNER_STACK_SIZE)
            .spawn(move || {
                let report = execute_in_place(&source, limits, worker_cancel);
                // The handle may already be gone; nobody is left to tell
                let _ = sender.send(report);
            });

        if let Err(err) = spawned {
            // The sender was dropped with the closure, so the first poll
            // reports the worker as dead
            error!("failed to start runner thread: {}", err);
        }

        RunHandle {
            receiver,
            cancel,
            started: Instant::now(),
            hard_deadline: limits.timeout + HARD_DEADLINE_GRACE,
            timeout_ms: limits.timeout_ms(),
        }
    }

    /// Poll for the finished report without blocking
    pub fn try_result(&mut self) -> Option<RunReport> {
        match self.receiver.try_recv() {
            Ok(report) => Some(report),
            Err(TryRecvError::Empty) => {
                if self.started.elapsed() >= self.hard_deadline {
                    Some(self.abandon())
                } else {
                    None
                }
            }
            Err(TryRecvError::Disconnected) => Some(self.worker_died()),
        }
    }

    /// Block until the run finishes or its hard deadline passes
    pub fn wait(mut self) -> RunReport {
        let remaining = self.hard_deadline.saturating_sub(self.started.elapsed());
        match self.receiver.recv_timeout(remaining) {
            Ok(report) => report,
            Err(RecvTimeoutError::Timeout) => self.abandon(),
            Err(RecvTimeoutError::Disconnected) => self.worker_died(),
        }
    }

    /// Ask the script to stop at its next yield point
    pub fn cancel(&self) {
        debug!("cancelling run after {:?}", self.started.elapsed());
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop waiting for a worker that ignored its own deadline
    fn abandon(&mut self) -> RunReport {
        warn!(
            "run overran its hard deadline of {:?}; abandoning worker",
            self.hard_deadline
        );
        self.cancel.cancel();
        RunReport::internal_failure(
            &format!("Error: Execution timed out after {} ms", self.timeout_ms),
            self.started.elapsed(),
        )
    }

    fn worker_died(&self) -> RunReport {
        error!("runner thread terminated unexpectedly");
        RunReport::internal_failure(WORKER_DIED, self.started.elapsed())
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        // A dropped handle must not leave a script spinning in the background
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CodeRunner, ExecutionResult};

    #[test]
    fn test_wait_returns_output() {
        let handle = CodeRunner::default().spawn("console.log(6 * 7);");
        let report = handle.wait();
        assert_eq!(report.result, ExecutionResult::Output(vec!["42".into()]));
    }

    #[test]
    fn test_cancel_stops_infinite_loop() {
        let handle = CodeRunner::default().spawn("while (true) {}");
        handle.cancel();
        assert!(handle.is_cancelled());
        let report = handle.wait();
        assert_eq!(
            report.result,
            ExecutionResult::Failure("Error: Execution cancelled".into())
        );
    }

    #[test]
    fn test_try_result_eventually_reports() {
        let mut handle = CodeRunner::default().spawn("let s = 0;\nfor (let i = 0; i < 100; i++) { s += i; }\nconsole.log(s);");
        let report = loop {
            if let Some(report) = handle.try_result() {
                break report;
            }
            std::thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(report.result.text(), "4950");
    }

    #[test]
    fn test_timeout_is_reported() {
        let limits = Limits::default()
            .with_timeout(Duration::from_millis(50))
            .with_max_steps(u64::MAX);
        let report = CodeRunner::new(limits).spawn("while (true) {}").wait();
        assert_eq!(
            report.result,
            ExecutionResult::Failure("Error: Execution timed out after 50 ms".into())
        );
    }
}
