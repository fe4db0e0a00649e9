use thiserror::Error;

/// Convenience result type used across the crate.
pub type PeopleResult<T> = Result<T, PeopleError>;

/// Error type returned by loading, enrichment and export functions.
///
/// Malformed geocoding responses are not represented here: the geocoding client degrades them to
/// empty fields instead of failing.
#[derive(Debug, Error)]
pub enum PeopleError {
    /// Underlying I/O error (e.g. output file cannot be created).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure, including non-2xx statuses.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local JSON could not be parsed or serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet writer error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// A dotted path could not be resolved against a record.
    ///
    /// `segment` is the first path segment that was missing (or whose parent was not an object).
    #[error("key not found: '{path}' (missing segment '{segment}')")]
    KeyNotFound { path: String, segment: String },

    /// Input data does not have the expected shape.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl PeopleError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
