//! The public error type.
//!
//! Internally the crate works with `anyhow::Result` and attaches context as errors travel up. At
//! the public boundary the `anyhow::Error` is wrapped together with an `ErrorType` so that callers
//! can tell a malformed CSV line apart from a failing disk without parsing messages.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The broad category of a failure.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// A CSV line (or an interactively entered record) could not be decoded into a boat.
    MalformedRecord,
    /// Reading or writing a file failed, other than a snapshot that simply does not exist.
    Persistence,
    /// The fleet home or its `config.json` is unusable.
    Config,
    /// A value supplied on the command line or at a prompt was rejected.
    Input,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The error returned by all public operations of this crate.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Returns true if this is a `MalformedRecord` error.
    pub fn is_malformed_record(&self) -> bool {
        self.error_type == ErrorType::MalformedRecord
    }

    /// Returns true if this is a `Persistence` error.
    pub fn is_persistence(&self) -> bool {
        self.error_type == ErrorType::Persistence
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The alternate form prints the whole context chain on one line.
        write!(f, "{:#}", self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts internal results into the public `Result`, tagging the error with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for anyhow::Result<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
