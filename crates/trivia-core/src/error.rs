use std::path::PathBuf;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when persisting or manipulating the question store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the store document failed.
    #[error("cannot access question file {path}: {source}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The store could not be serialized.
    #[error("cannot encode question file {path}: {source}")]
    Json {
        /// The file being written.
        path: PathBuf,
        /// The underlying encoder failure.
        #[source]
        source: serde_json::Error,
    },

    /// A pool index did not refer to a question.
    #[error("question index {index} is out of range (pool has {len} questions)")]
    IndexOutOfRange {
        /// The zero-based index that was requested.
        index: usize,
        /// Size of the pool at the time of the request.
        len: usize,
    },
}
