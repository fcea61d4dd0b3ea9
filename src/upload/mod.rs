mod batch;
mod client;
mod naming;
mod types;

pub use batch::{run_batch, BatchOutcome, OverwritePrompt, UploadBatch};
pub use client::ImageServer;
pub use naming::{
    evaluate_gate, is_upload_enabled, overwrite_prompt, sanitize_suffix, target_filename,
    validate_suffix, SuffixGate,
};
pub use types::{
    FileStatus, SelectedFile, Severity, StatusMessage, StatusSink, UploadEvent, UploadReceipt,
    UploadStatus,
};
