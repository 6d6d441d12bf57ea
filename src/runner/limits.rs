//! Execution budget and cooperative cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::interpreter::constants::{
    DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_COLLECTION_LEN, DEFAULT_MAX_OUTPUT_LINES,
    DEFAULT_MAX_STEPS, DEFAULT_TIMEOUT_MS,
};

/// Resource limits applied to a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_steps: u64,
    pub timeout: Duration,
    pub max_call_depth: usize,
    pub max_output_lines: usize,
    pub max_collection_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_steps: DEFAULT_MAX_STEPS,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_output_lines: DEFAULT_MAX_OUTPUT_LINES,
            max_collection_len: DEFAULT_MAX_COLLECTION_LEN,
        }
    }
}

impl Limits {
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_output_lines(mut self, lines: usize) -> Self {
        self.max_output_lines = lines;
        self
    }

    pub fn timeout_ms(&self) -> u128 {
        self.timeout.as_millis()
    }
}

/// Shared flag a caller flips to stop a running script at its next yield point
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_steps, 5_000_000);
        assert_eq!(limits.timeout_ms(), 2_000);
        assert_eq!(limits.max_call_depth, 200);
        assert_eq!(limits.max_output_lines, 1_000);
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
