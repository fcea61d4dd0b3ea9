use crate::error::UploadError;
use serde::Deserialize;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// A file held by a drop zone.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub mime: String,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime: "image/png".to_string(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = std::fs::read(path).map_err(|source| UploadError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Ok(Self::new(name, bytes))
    }

    pub fn is_png(&self) -> bool {
        self.name.to_lowercase().ends_with(".png")
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Error,
}

/// The single message shown on the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Normal,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Processing,
    Success,
    Error(String),
    Skipped(String),
}

/// Per-file progress, keyed by the remote filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub name: String,
    pub status: UploadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Status(StatusMessage),
    File(FileStatus),
}

/// Body returned by the upload endpoint on success. Parsed best-effort.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub path: Option<String>,
}

/// Receiver of batch progress.
pub trait StatusSink {
    fn publish(&mut self, event: UploadEvent);
}

impl StatusSink for Sender<UploadEvent> {
    fn publish(&mut self, event: UploadEvent) {
        self.send(event).unwrap_or_default();
    }
}

impl StatusSink for Vec<UploadEvent> {
    fn publish(&mut self, event: UploadEvent) {
        self.push(event);
    }
}
