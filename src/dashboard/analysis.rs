//! Simulated code analysis
//!
//! Nothing is analyzed. Starting a review flips the session into an
//! analyzing state; once the configured delay has passed the reviewed record
//! replaces the initial one. Time is passed in explicitly so the transition
//! can be driven deterministically.

use std::time::{Duration, Instant};

use log::debug;

use crate::fixtures::analysis::{AnalysisRecord, INITIAL_ANALYSIS, REVIEWED_ANALYSIS};

/// How long the simulated review takes by default
pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnalysisState {
    Idle,
    Analyzing { since: Instant },
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    record: &'static AnalysisRecord,
    state: AnalysisState,
    delay: Duration,
}

impl AnalysisSession {
    pub fn new(delay: Duration) -> Self {
        AnalysisSession {
            record: &INITIAL_ANALYSIS,
            state: AnalysisState::Idle,
            delay,
        }
    }

    pub fn record(&self) -> &'static AnalysisRecord {
        self.record
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, AnalysisState::Analyzing { .. })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_analyzing() {
            "Analyzing..."
        } else {
            "Analyze Code"
        }
    }

    /// Begin a review; ignored while one is already running
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_analyzing() {
            return false;
        }
        debug!("analysis started");
        self.state = AnalysisState::Analyzing { since: now };
        true
    }

    /// Advance the clock; returns true on the tick that completes the review
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            AnalysisState::Analyzing { since } if now.saturating_duration_since(since) >= self.delay => {
                self.record = &REVIEWED_ANALYSIS;
                self.state = AnalysisState::Idle;
                debug!("analysis finished");
                true
            }
            _ => false,
        }
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        AnalysisSession::new(DEFAULT_ANALYSIS_DELAY)
    }
}
