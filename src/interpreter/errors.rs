//! Runtime error types for the LearnScript interpreter
//!
//! This module defines [`RuntimeError`], which represents everything that can
//! stop or unwind a script: JavaScript-style exceptions (`ReferenceError`,
//! `TypeError`, `RangeError`, thrown values) and the host-imposed limits
//! (step budget, timeout, cancellation, output cap).
//!
//! Exceptions can be caught by a script's `try`/`catch`. Limit violations
//! cannot: they always unwind to the runner. `Display` renders the error the
//! way JavaScript's `String(error)` would.

use crate::memory::value::Value;
use crate::parser::ast::SourceLocation;
use crate::parser::parse::ParseError;
use std::fmt;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone)]
pub enum RuntimeError {
    /// Source failed to lex or parse
    Syntax {
        message: String,
        location: SourceLocation,
    },

    /// Unknown identifier or a `let`/`const` read before initialization
    Reference {
        message: String,
        location: SourceLocation,
    },

    /// Operation applied to a value of the wrong kind
    Type {
        message: String,
        location: SourceLocation,
    },

    /// Numeric argument out of range
    Range {
        message: String,
        location: SourceLocation,
    },

    /// Too many nested calls; catchable like any `RangeError`
    CallStackExceeded { location: SourceLocation },

    /// A value thrown by the script's own `throw` statement
    Thrown {
        value: Value,
        location: SourceLocation,
    },

    /// Step budget exhausted
    StepLimitExceeded { limit: u64 },

    /// Wall-clock budget exhausted
    Timeout { limit_ms: u128 },

    /// The run's cancel token was triggered
    Cancelled,

    /// Too many print-style calls
    OutputLimitExceeded { limit: usize },
}

impl RuntimeError {
    pub fn reference(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Reference {
            message: message.into(),
            location,
        }
    }

    pub fn type_error(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Type {
            message: message.into(),
            location,
        }
    }

    pub fn range(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Range {
            message: message.into(),
            location,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::Syntax { location, .. } => Some(location),
            RuntimeError::Reference { location, .. } => Some(location),
            RuntimeError::Type { location, .. } => Some(location),
            RuntimeError::Range { location, .. } => Some(location),
            RuntimeError::CallStackExceeded { location } => Some(location),
            RuntimeError::Thrown { location, .. } => Some(location),
            RuntimeError::StepLimitExceeded { .. } => None,
            RuntimeError::Timeout { .. } => None,
            RuntimeError::Cancelled => None,
            RuntimeError::OutputLimitExceeded { .. } => None,
        }
    }

    /// Whether a script `catch` block may intercept this error
    pub fn is_catchable(&self) -> bool {
        !matches!(
            self,
            RuntimeError::StepLimitExceeded { .. }
                | RuntimeError::Timeout { .. }
                | RuntimeError::Cancelled
                | RuntimeError::OutputLimitExceeded { .. }
        )
    }

    /// Whether this error comes from a host limit rather than the script itself
    pub fn is_limit(&self) -> bool {
        !self.is_catchable() || matches!(self, RuntimeError::CallStackExceeded { .. })
    }

    /// JavaScript constructor name and message, for building error objects
    pub fn name_and_message(&self) -> (&'static str, String) {
        match self {
            RuntimeError::Syntax { message, .. } => ("SyntaxError", message.clone()),
            RuntimeError::Reference { message, .. } => ("ReferenceError", message.clone()),
            RuntimeError::Type { message, .. } => ("TypeError", message.clone()),
            RuntimeError::Range { message, .. } => ("RangeError", message.clone()),
            RuntimeError::CallStackExceeded { .. } => {
                ("RangeError", "Maximum call stack size exceeded".to_string())
            }
            RuntimeError::Thrown { value, .. } => ("Error", value.to_js_string()),
            RuntimeError::StepLimitExceeded { limit } => (
                "RangeError",
                format!("Execution step limit of {} exceeded", limit),
            ),
            RuntimeError::Timeout { limit_ms } => {
                ("Error", format!("Execution timed out after {} ms", limit_ms))
            }
            RuntimeError::Cancelled => ("Error", "Execution cancelled".to_string()),
            RuntimeError::OutputLimitExceeded { limit } => (
                "RangeError",
                format!("Output limit of {} lines exceeded", limit),
            ),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Syntax { message, location } => {
                write!(
                    f,
                    "SyntaxError: {} (line {}, column {})",
                    message, location.line, location.column
                )
            }
            RuntimeError::Thrown { value, .. } => write!(f, "{}", value.to_js_string()),
            RuntimeError::Timeout { limit_ms } => {
                write!(f, "Execution timed out after {} ms", limit_ms)
            }
            RuntimeError::Cancelled => write!(f, "Execution cancelled"),
            other => {
                let (name, message) = other.name_and_message();
                write!(f, "{}: {}", name, message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ParseError> for RuntimeError {
    fn from(err: ParseError) -> Self {
        RuntimeError::Syntax {
            message: err.message,
            location: err.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(3, 7)
    }

    #[test]
    fn test_display_matches_javascript() {
        assert_eq!(
            RuntimeError::reference("undefinedVariable is not defined", loc()).to_string(),
            "ReferenceError: undefinedVariable is not defined"
        );
        assert_eq!(
            RuntimeError::CallStackExceeded { location: loc() }.to_string(),
            "RangeError: Maximum call stack size exceeded"
        );
        assert_eq!(
            RuntimeError::Timeout { limit_ms: 2000 }.to_string(),
            "Execution timed out after 2000 ms"
        );
        assert_eq!(
            RuntimeError::StepLimitExceeded { limit: 10 }.to_string(),
            "RangeError: Execution step limit of 10 exceeded"
        );
    }

    #[test]
    fn test_thrown_values_render_as_strings() {
        let thrown = RuntimeError::Thrown {
            value: Value::from("plain string"),
            location: loc(),
        };
        assert_eq!(thrown.to_string(), "plain string");

        let error = RuntimeError::Thrown {
            value: Value::new_error("Error", "Something went wrong"),
            location: loc(),
        };
        assert_eq!(error.to_string(), "Error: Something went wrong");
    }

    #[test]
    fn test_syntax_error_from_parse_error() {
        let err: RuntimeError = ParseError {
            message: "Unexpected token ')'".to_string(),
            location: loc(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "SyntaxError: Unexpected token ')' (line 3, column 7)"
        );
        assert!(err.is_catchable());
    }

    #[test]
    fn test_limits_are_not_catchable() {
        assert!(!RuntimeError::Cancelled.is_catchable());
        assert!(!RuntimeError::OutputLimitExceeded { limit: 1 }.is_catchable());
        assert!(RuntimeError::CallStackExceeded { location: loc() }.is_catchable());
        assert!(RuntimeError::CallStackExceeded { location: loc() }.is_limit());
    }
}
