//! Code editor tab: source buffer, run lifecycle and output
//!
//! The session owns at most one [`RunHandle`]. A run request while a run is
//! in flight is rejected, so results can never interleave and the output
//! view always shows the latest completed run.

use std::time::Duration;

use log::debug;

use crate::dashboard::buffer::SourceBuffer;
use crate::fixtures::{RESET_SNIPPET, WELCOME_SNIPPET};
use crate::runner::{CodeRunner, ExecutionResult, RunHandle, RunReport};

/// Shown in the output pane before the first run
pub const OUTPUT_PLACEHOLDER: &str = "Press Ctrl+R to run your code and see output here...";

/// Answer to a run request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunRequest {
    Started,
    /// A run is already in flight; nothing was started
    Busy,
}

/// What the output pane displays
#[derive(Debug, Clone, Default)]
pub struct OutputView {
    report: Option<RunReport>,
    pub scroll: usize,
}

impl OutputView {
    pub fn result(&self) -> Option<&ExecutionResult> {
        self.report.as_ref().map(|r| &r.result)
    }

    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    /// Lines to draw: the placeholder, the output lines, or the failure text
    pub fn display_lines(&self) -> Vec<&str> {
        match self.result() {
            None => vec![OUTPUT_PLACEHOLDER],
            Some(ExecutionResult::Output(lines)) => lines.iter().map(String::as_str).collect(),
            Some(ExecutionResult::Failure(message)) => message.lines().collect(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.result().is_some_and(ExecutionResult::is_failure)
    }

    fn show(&mut self, report: RunReport) {
        self.report = Some(report);
        self.scroll = 0;
    }

    fn clear(&mut self) {
        self.report = None;
        self.scroll = 0;
    }
}

pub struct EditorSession {
    runner: CodeRunner,
    pub buffer: SourceBuffer,
    pub output: OutputView,
    running: Option<RunHandle>,
}

impl EditorSession {
    pub fn new(runner: CodeRunner) -> Self {
        EditorSession {
            runner,
            buffer: SourceBuffer::new(WELCOME_SNIPPET),
            output: OutputView::default(),
            running: None,
        }
    }

    pub fn runner(&self) -> &CodeRunner {
        &self.runner
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Time the in-flight run has taken so far
    pub fn running_for(&self) -> Option<Duration> {
        self.running.as_ref().map(RunHandle::elapsed)
    }

    /// Start running the current buffer in the background
    pub fn run(&mut self) -> RunRequest {
        if self.running.is_some() {
            debug!("run request rejected: a run is already in flight");
            return RunRequest::Busy;
        }
        self.running = Some(self.runner.spawn(&self.buffer.text()));
        RunRequest::Started
    }

    /// Collect the in-flight run if it has finished.
    /// Returns the result once, on the poll that completes the run.
    pub fn poll(&mut self) -> Option<&ExecutionResult> {
        let report = self.running.as_mut()?.try_result()?;
        self.running = None;
        self.output.show(report);
        self.output.result()
    }

    /// Block until the in-flight run finishes
    pub fn wait(&mut self) -> Option<&ExecutionResult> {
        let handle = self.running.take()?;
        self.output.show(handle.wait());
        self.output.result()
    }

    /// Ask the in-flight run to stop; its cancellation failure arrives through `poll`
    pub fn cancel(&mut self) -> bool {
        match &self.running {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Restore the short default snippet and clear the output.
    /// An in-flight run is cancelled and its result discarded.
    pub fn reset(&mut self) {
        self.running = None;
        self.buffer.set_text(RESET_SNIPPET);
        self.output.clear();
    }

    /// Replace the buffer with `source`, clearing the output
    pub fn load(&mut self, source: &str) {
        self.running = None;
        self.buffer.set_text(source);
        self.output.clear();
    }
}
