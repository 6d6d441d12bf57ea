//! Host-side errors
//!
//! Script faults never reach this type; the runner turns them into
//! `ExecutionResult::Failure`. These are the errors of the program around
//! the runner: terminal I/O, config files and script files.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Terminal error: {}", .0)]
    Terminal(#[from] std::io::Error),

    #[error("Unknown start tab `{}`; expected one of editor, analysis, tutorials, exercises", .0)]
    UnknownTab(String),

    #[error("Invalid limit: {}", .0)]
    InvalidLimit(String),
}

impl Error {
    pub fn yaml_error(
        action: &str,
        file_description: &str,
        path: &str,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action: action.to_string(),
            file_description: file_description.to_string(),
            path: path.to_string(),
            original,
        }
    }

    pub fn io_error(file_description: &str, path: &str, original: std::io::Error) -> Self {
        Self::Io {
            file_description: file_description.to_string(),
            path: path.to_string(),
            original,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = Error::io_error(
            "script",
            "/tmp/missing.js",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(
            err.to_string(),
            "IO error with script file at path `/tmp/missing.js`: not found"
        );
    }

    #[test]
    fn test_unknown_tab_display() {
        let err = Error::UnknownTab("home".to_string());
        assert!(err.to_string().starts_with("Unknown start tab `home`"));
    }
}
