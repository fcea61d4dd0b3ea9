//! Error types for selecting and uploading images.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while accepting files or running an upload batch.
///
/// The `Display` text of each variant is what ends up on the status line.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The file name does not end in `.png`
    #[error("Only PNG files allowed")]
    InvalidFileType {
        /// Name of the rejected file
        name: String,
    },

    /// Suffix empty or shorter than the configured minimum after trimming
    #[error("Filename suffix is required and must be at least {min_len} characters.")]
    MissingSuffix {
        /// Minimum number of characters
        min_len: usize,
    },

    /// Upload triggered with nothing selected
    #[error("No files selected to upload")]
    NoFilesSelected,

    /// The existence probe never got a response. Not fatal.
    #[error("Existence check failed for {filename}: {source}")]
    ExistenceCheckTransport {
        filename: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered the upload with a non-2xx status
    #[error("Upload failed for {filename}: {status} {body}")]
    UploadRejected {
        filename: String,
        status: u16,
        body: String,
    },

    /// The upload request never got a response
    #[error("Network error uploading {filename}")]
    UploadTransport {
        filename: String,
        #[source]
        source: reqwest::Error,
    },

    /// A picked or dropped file could not be read from disk
    #[error("Unable to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker thread could not build its async runtime
    #[error("Unable to start upload worker: {0}")]
    Runtime(#[source] std::io::Error),

    /// The worker thread went away without reporting an outcome
    #[error("Upload worker stopped unexpectedly")]
    WorkerStopped,
}

/// Errors raised while loading or validating [`crate::config::UploaderConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Drop zone keys must not be empty")]
    EmptyZoneKey,

    #[error("Duplicate drop zone key '{0}'")]
    DuplicateZone(String),

    #[error("min_suffix_len must be at least 1")]
    InvalidSuffixLength,
}
