use std::path::PathBuf;

/// Errors from reading artwork bytes or headers.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out after {seconds}s fetching {location}")]
    Timeout { location: String, seconds: u64 },

    #[error("Could not read image dimensions from {0}")]
    Unreadable(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Storage failures. Creating the jukebox roots is the one fatal error
/// of a batch.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Could not create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reading or writing the library state file.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
