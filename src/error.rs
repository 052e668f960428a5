//! Unified error types for whiff.
//!
//! Library code uses `Error` and `Result<T>`.
//! Binary code (`main.rs`) uses `anyhow` for ergonomic CLI error handling.

use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Unified error type for whiff library operations.
///
/// File-local failures (syntax, unknown roles, bad directives, detector
/// failures) are converted to pseudo-warnings by the examiner; configuration
/// and I/O failures surface to the caller.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The source dump could not be read.
    #[error("syntax error at line {line}: {message}")]
    Syntax {
        /// 1-based line in the dump where reading failed.
        line: u32,
        /// Description of what went wrong.
        message: String,
    },

    /// A raw node carried a tag outside the closed role set.
    #[error("unknown node role `{tag}` at line {line}")]
    UnknownNodeRole {
        /// The offending raw tag.
        tag: String,
        /// 1-based line of the offending node.
        line: u32,
    },

    /// An inline directive comment could not be understood.
    #[error("bad directive at line {line}: {message}")]
    Directive {
        /// 1-based line of the directive comment.
        line: u32,
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration file error.
    #[error("configuration error in {}: {message}", path.display())]
    Config {
        /// Path to the problematic configuration file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration parse error.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Unknown detector name provided.
    #[error("unknown detector: {0}")]
    UnknownDetector(String),

    /// A detector raised while examining a context.
    #[error("detector `{detector}` failed on `{context}`: {message}")]
    Detector {
        /// The failing detector's smell subclass.
        detector: String,
        /// Full name of the context being examined.
        context: String,
        /// The underlying failure.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a syntax error.
    pub fn syntax(line: u32, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Create an unknown-role error.
    pub fn unknown_role(tag: impl Into<String>, line: u32) -> Self {
        Self::UnknownNodeRole {
            tag: tag.into(),
            line,
        }
    }

    /// Create a directive error.
    pub fn directive(line: u32, message: impl Into<String>) -> Self {
        Self::Directive {
            line,
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unknown detector error.
    pub fn unknown_detector(name: impl Into<String>) -> Self {
        Self::UnknownDetector(name.into())
    }

    /// Create a detector failure.
    pub fn detector(
        detector: impl Into<String>,
        context: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Detector {
            detector: detector.into(),
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// True when the failure is local to a single analyzed file.
    ///
    /// File-local errors become pseudo-warnings; everything else aborts the
    /// run.
    pub fn is_file_local(&self) -> bool {
        matches!(
            self,
            Error::Syntax { .. }
                | Error::UnknownNodeRole { .. }
                | Error::Directive { .. }
                | Error::Detector { .. }
        )
    }
}

/// Result type alias for whiff library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::syntax(3, "unexpected token");
        assert_eq!(err.to_string(), "syntax error at line 3: unexpected token");

        let err = Error::unknown_role("wibble", 7);
        assert_eq!(err.to_string(), "unknown node role `wibble` at line 7");

        let err = Error::unknown_detector("fake_detector");
        assert_eq!(err.to_string(), "unknown detector: fake_detector");
    }

    #[test]
    fn test_file_local_classification() {
        assert!(Error::syntax(1, "x").is_file_local());
        assert!(Error::unknown_role("t", 1).is_file_local());
        assert!(Error::directive(1, "x").is_file_local());
        assert!(Error::detector("d", "c", "boom").is_file_local());
        assert!(!Error::config("whiff.toml", "bad").is_file_local());
        assert!(!Error::unknown_detector("nope").is_file_local());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
