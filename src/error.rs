//! Error handling for the sort utility

use std::io;
use thiserror::Error;

/// Custom error type for sort operations
#[derive(Error, Debug)]
pub enum SortError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Permission denied: {file}")]
    PermissionDenied { file: String },

    #[error("No such file or directory: {file}")]
    FileNotFound { file: String },

    #[error("Is a directory: {file}")]
    IsDirectory { file: String },

    #[error("Invalid field separator: {sep}")]
    InvalidFieldSeparator { sep: String },

    #[error("Conflicting sort options: {message}")]
    ConflictingOptions { message: String },

    #[error("extra operand '{operand}'")]
    ExtraOperand { operand: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SortError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        // Disorder is reported through `CheckOutcome`, so every error here is fatal.
        crate::SORT_FAILURE
    }

    /// Create a permission denied error
    pub fn permission_denied(file: &str) -> Self {
        SortError::PermissionDenied {
            file: file.to_string(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(file: &str) -> Self {
        SortError::FileNotFound {
            file: file.to_string(),
        }
    }

    /// Create an is directory error
    pub fn is_directory(file: &str) -> Self {
        SortError::IsDirectory {
            file: file.to_string(),
        }
    }

    /// Create an invalid field separator error
    pub fn invalid_field_separator(sep: &str) -> Self {
        SortError::InvalidFieldSeparator {
            sep: sep.to_string(),
        }
    }

    /// Create a conflicting options error
    pub fn conflicting_options(message: &str) -> Self {
        SortError::ConflictingOptions {
            message: message.to_string(),
        }
    }

    pub fn extra_operand(operand: &str) -> Self {
        SortError::ExtraOperand {
            operand: operand.to_string(),
        }
    }

    /// Create an internal error
    pub fn internal(message: &str) -> Self {
        SortError::Internal {
            message: message.to_string(),
        }
    }
}

/// Result type for sort operations
pub type SortResult<T> = Result<T, SortError>;

/// Context trait for adding file names to I/O failures
pub trait SortContext<T> {
    fn with_context<F>(self, f: F) -> SortResult<T>
    where
        F: FnOnce() -> String;

    fn with_file_context(self, filename: &str) -> SortResult<T>;
}

fn classify(io_err: io::Error, filename: &str) -> SortError {
    match io_err.kind() {
        io::ErrorKind::PermissionDenied => SortError::permission_denied(filename),
        io::ErrorKind::NotFound => SortError::file_not_found(filename),
        _ => SortError::Io(io::Error::new(
            io_err.kind(),
            format!("{}: {}", filename, io_err),
        )),
    }
}

impl<T> SortContext<T> for SortResult<T> {
    fn with_context<F>(self, f: F) -> SortResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| match err {
            SortError::Io(io_err) => SortError::Io(io::Error::new(
                io_err.kind(),
                format!("{}: {}", f(), io_err),
            )),
            other => other,
        })
    }

    fn with_file_context(self, filename: &str) -> SortResult<T> {
        self.map_err(|err| match err {
            SortError::Io(io_err) => classify(io_err, filename),
            other => other,
        })
    }
}

impl<T> SortContext<T> for Result<T, io::Error> {
    fn with_context<F>(self, f: F) -> SortResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|io_err| {
            SortError::Io(io::Error::new(
                io_err.kind(),
                format!("{}: {}", f(), io_err),
            ))
        })
    }

    fn with_file_context(self, filename: &str) -> SortResult<T> {
        self.map_err(|io_err| classify(io_err, filename))
    }
}
