//! Error types for git-where-core.
//!
//! This module defines a custom error type using `thiserror` for the library's
//! public API, while using `anyhow` internally for error propagation in the CLI.
//!
//! Note that "not found" is deliberately absent: a missing application or
//! installation is reported as `Ok(None)` (or an empty `Vec`), never as an
//! error. Errors are reserved for caller misuse and filesystem faults.

use thiserror::Error;

/// A specialized Result type for git-where-core operations.
///
/// This is a convenience alias that uses our custom [`Error`] type.
///
/// # Example
///
/// ```
/// use git_where_core::Result;
///
/// fn locate() -> Result<Option<String>> {
///     Ok(None)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating executables and Git installations.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error raised by the filesystem seam.
    ///
    /// Permission problems and similar faults are passed through unchanged;
    /// a path that simply does not exist never ends up here.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller supplied an argument that can never succeed.
    ///
    /// Covers a missing execution context, a blank or non-UTF-8 path, an
    /// unknown distribution identifier, or a distribution without a path
    /// table entry.
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// The name of the offending argument.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Localization system error.
    ///
    /// This covers errors in loading or using Fluent translation files.
    #[error("Localization error: {0}")]
    L10n(String),
}

// Helper constructors for common error cases
impl Error {
    /// Creates an InvalidArgument error.
    ///
    /// # Example
    ///
    /// ```
    /// use git_where_core::Error;
    ///
    /// let err = Error::invalid_argument("path", "must not be blank");
    /// assert!(err.is_invalid_argument());
    /// ```
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Creates an L10n error.
    pub fn l10n(message: impl Into<String>) -> Self {
        Error::L10n(message.into())
    }

    /// Returns `true` if this error signals caller misuse.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }
}
