use crate::error::UploadError;
use crate::upload::client::ImageServer;
use crate::upload::naming::{overwrite_prompt, target_filename};
use crate::upload::types::{
    FileStatus, SelectedFile, StatusMessage, StatusSink, UploadEvent, UploadStatus,
};

/// Asks the user whether an existing remote file may be replaced.
///
/// Blocking: the batch waits for the answer before touching the next file.
pub trait OverwritePrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> OverwritePrompt for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Snapshot of the selection taken when the upload was triggered.
#[derive(Debug, Clone)]
pub struct UploadBatch {
    suffix: String,
    entries: Vec<(String, SelectedFile)>,
}

impl UploadBatch {
    /// `suffix` must already be sanitized.
    pub fn new(suffix: impl Into<String>, entries: Vec<(String, SelectedFile)>) -> Self {
        Self {
            suffix: suffix.into(),
            entries,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn entries(&self) -> &[(String, SelectedFile)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How a batch ended. Zone keys, not remote filenames.
#[derive(Debug)]
pub enum BatchOutcome {
    Completed {
        uploaded: Vec<String>,
        skipped: Vec<String>,
    },
    Aborted {
        uploaded: Vec<String>,
        error: UploadError,
    },
}

impl BatchOutcome {
    pub fn uploaded(&self) -> &[String] {
        match self {
            Self::Completed { uploaded, .. } | Self::Aborted { uploaded, .. } => uploaded,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

fn publish_file(sink: &mut impl StatusSink, name: &str, status: UploadStatus) {
    sink.publish(UploadEvent::File(FileStatus {
        name: name.to_string(),
        status,
    }));
}

/// Upload every entry of `batch` in order.
///
/// Files run strictly one after another. The first rejected or failed
/// upload stops the batch; the terminal status line is left to the caller.
pub async fn run_batch(
    batch: &UploadBatch,
    server: &ImageServer,
    prompt: &mut impl OverwritePrompt,
    sink: &mut impl StatusSink,
) -> BatchOutcome {
    sink.publish(UploadEvent::Status(StatusMessage::info("Uploading...")));
    log::info!(
        "Uploading {} file(s) with suffix '{}'",
        batch.len(),
        batch.suffix()
    );

    let mut uploaded = Vec::new();
    let mut skipped = Vec::new();

    for (key, file) in batch.entries() {
        let filename = target_filename(key, batch.suffix());
        publish_file(sink, &filename, UploadStatus::Processing);

        let exists = match server.exists(&filename).await {
            Ok(exists) => exists,
            Err(e) => {
                log::warn!("{e}; uploading anyway");
                false
            }
        };

        if exists && !prompt.confirm(&overwrite_prompt(&filename)) {
            log::info!("Keeping existing {filename}");
            sink.publish(UploadEvent::Status(StatusMessage::info(format!(
                "Skipped {filename}"
            ))));
            publish_file(
                sink,
                &filename,
                UploadStatus::Skipped("Kept existing file".to_string()),
            );
            skipped.push(key.clone());
            continue;
        }

        match server.upload(&filename, file).await {
            Ok(receipt) => {
                match receipt.path {
                    Some(path) => log::info!("Uploaded {filename} to {path}"),
                    None => log::info!("Uploaded {filename}"),
                }
                sink.publish(UploadEvent::Status(StatusMessage::info(format!(
                    "Uploaded {filename}"
                ))));
                publish_file(sink, &filename, UploadStatus::Success);
                uploaded.push(key.clone());
            }
            Err(error) => {
                match &error {
                    UploadError::UploadTransport { source, .. } => {
                        log::error!("upload error for {filename}: {source}")
                    }
                    other => log::error!("{other}"),
                }
                publish_file(sink, &filename, UploadStatus::Error(error.to_string()));
                return BatchOutcome::Aborted { uploaded, error };
            }
        }
    }

    BatchOutcome::Completed { uploaded, skipped }
}
