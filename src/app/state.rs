use super::prompt::PromptRequest;
use crate::upload::{BatchOutcome, UploadEvent, UploadStatus};
use eframe::egui::Rect;
use std::collections::HashMap;
use std::sync::mpsc::Receiver;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionProgress {
    NotStarted,
    Uploading {
        total: usize,
        current: usize,
        uploaded: usize,
        skipped: usize,
        failed: usize,
    },
    Completed {
        total: usize,
        uploaded: usize,
        skipped: usize,
        failed: usize,
    },
}

impl Default for ActionProgress {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// UI-side bookkeeping of the running (or last) batch.
#[derive(Default)]
pub struct UploadState {
    pub progress: ActionProgress,
    pub is_uploading: bool,
    pub current_file: Option<String>,
    pub last_uploaded: Option<String>,
    pub pending_prompt: Option<PromptRequest>,
    /// Drop-zone rectangles from the previous frame, used to route drops
    pub zone_rects: HashMap<String, Rect>,
    pub event_receiver: Option<Receiver<UploadEvent>>,
    pub prompt_receiver: Option<Receiver<PromptRequest>>,
    pub outcome_receiver: Option<Receiver<BatchOutcome>>,
}

impl UploadState {
    pub fn begin(
        &mut self,
        total: usize,
        events: Receiver<UploadEvent>,
        prompts: Receiver<PromptRequest>,
        outcome: Receiver<BatchOutcome>,
    ) {
        self.progress = ActionProgress::Uploading {
            total,
            current: 0,
            uploaded: 0,
            skipped: 0,
            failed: 0,
        };
        self.is_uploading = true;
        self.current_file = None;
        self.last_uploaded = None;
        self.pending_prompt = None;
        self.event_receiver = Some(events);
        self.prompt_receiver = Some(prompts);
        self.outcome_receiver = Some(outcome);
    }

    pub fn record(&mut self, event: &UploadEvent) {
        let UploadEvent::File(file) = event else {
            return;
        };
        self.current_file = Some(file.name.clone());

        if let ActionProgress::Uploading {
            current,
            uploaded,
            skipped,
            failed,
            ..
        } = &mut self.progress
        {
            match &file.status {
                UploadStatus::Processing => *current += 1,
                UploadStatus::Success => *uploaded += 1,
                UploadStatus::Skipped(_) => *skipped += 1,
                UploadStatus::Error(_) => *failed += 1,
            }
        }
    }

    pub fn finish(&mut self, outcome: &BatchOutcome) {
        if let ActionProgress::Uploading {
            total,
            uploaded,
            skipped,
            failed,
            ..
        } = self.progress
        {
            self.progress = ActionProgress::Completed {
                total,
                uploaded,
                skipped,
                // A worker that died before reporting still failed the batch
                failed: if outcome.is_completed() {
                    failed
                } else {
                    failed.max(1)
                },
            };
        }
        self.is_uploading = false;
        self.pending_prompt = None;
        self.event_receiver = None;
        self.prompt_receiver = None;
        self.outcome_receiver = None;
    }

    pub fn get_progress_percentage(&self) -> f32 {
        match &self.progress {
            ActionProgress::NotStarted => 0.0,
            ActionProgress::Uploading {
                total,
                uploaded,
                skipped,
                failed,
                ..
            } => {
                if *total == 0 {
                    0.0
                } else {
                    (uploaded + skipped + failed) as f32 / *total as f32
                }
            }
            ActionProgress::Completed {
                total,
                uploaded,
                skipped,
                failed,
            } => {
                if *total == 0 {
                    0.0
                } else {
                    (uploaded + skipped + failed) as f32 / *total as f32
                }
            }
        }
    }

    pub fn get_status_text(&self) -> String {
        match &self.progress {
            ActionProgress::NotStarted => String::new(),
            ActionProgress::Uploading {
                total,
                current,
                uploaded,
                skipped,
                failed,
            } => format!(
                "Progress: {}/{} files | ✅ Uploaded: {} | ⏩ Skipped: {} | ❌ Failed: {}",
                current, total, uploaded, skipped, failed
            ),
            ActionProgress::Completed {
                total,
                uploaded,
                skipped,
                failed,
            } => format!(
                "Final Status: {}/{} files | ✅ Uploaded: {} | ⏩ Skipped: {} | ❌ Failed: {}",
                uploaded + skipped + failed,
                total,
                uploaded,
                skipped,
                failed
            ),
        }
    }
}
