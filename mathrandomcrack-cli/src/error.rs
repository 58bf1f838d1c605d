//! CLI-specific errors.

/// Errors raised while reading and parsing an observation file.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// A line did not parse as the expected observation shape.
    #[error("line {line}: {message}")]
    BadLine {
        /// 1-based line number in the source file.
        line: usize,
        /// Description of what was expected.
        message: String,
    },
}
