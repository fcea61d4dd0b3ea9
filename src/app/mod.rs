mod preview;
mod prompt;
mod state;
mod ui;

use crate::config::UploaderConfig;
use crate::controller::{UploadController, WidgetEvents};
use crate::error::UploadError;
use crate::upload::{
    run_batch, BatchOutcome, ImageServer, SelectedFile, StatusSink, UploadEvent, UploadStatus,
};
use crate::utils::color::ColorExt;
use eframe::egui::{self, Color32};
use eframe::App;
pub use preview::TexturePreviews;
pub use prompt::{ChannelPrompt, PromptRequest};
pub use state::{ActionProgress, UploadState};
use std::sync::mpsc::{self as std_mpsc, TryRecvError};

pub struct LogoUploader {
    config: UploaderConfig,
    server: ImageServer,
    controller: UploadController<TexturePreviews>,
    suffix_input: String,
    status_color: Color32,
    error_color: Color32,
    state: UploadState,
}

impl LogoUploader {
    pub fn new(cc: &eframe::CreationContext<'_>, config: UploaderConfig, server: ImageServer) -> Self {
        log::info!(
            "Initializing logo uploader for {} ({} drop zones)",
            config.server_url,
            config.zones.len()
        );
        let previews = TexturePreviews::new(cc.egui_ctx.clone());
        let controller = UploadController::new(&config, previews);
        let status_color = Color32::parse_css_hex(&config.status_color)
            .unwrap_or(Color32::from_rgb(0x99, 0xcc, 0xff));
        let error_color = Color32::parse_css_hex(&config.error_color)
            .unwrap_or(Color32::from_rgb(0xff, 0x66, 0x66));

        Self {
            config,
            server,
            controller,
            suffix_input: String::new(),
            status_color,
            error_color,
            state: UploadState::default(),
        }
    }

    /// Open the native picker for zone `key`.
    pub fn choose_file(&mut self, key: &str) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png", "PNG"])
            .pick_file()
        else {
            return;
        };

        match SelectedFile::from_path(&path) {
            Ok(file) => self.controller.on_file_chosen(key, file),
            Err(e) => {
                log::error!("{e}");
                self.controller.report_error(&e);
            }
        }
    }

    fn dropped_file(file: &egui::DroppedFile) -> Result<Option<SelectedFile>, UploadError> {
        if let Some(bytes) = &file.bytes {
            return Ok(Some(SelectedFile::new(file.name.clone(), bytes.clone())));
        }
        match &file.path {
            Some(path) => SelectedFile::from_path(path).map(Some),
            None => Ok(None),
        }
    }

    /// Route OS drag-and-drop to the zone under the pointer.
    fn handle_drag_and_drop(&mut self, ctx: &egui::Context) {
        let (hovering, dropped, pointer) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
                i.pointer.latest_pos(),
            )
        });

        let under_pointer = pointer.and_then(|pos| {
            self.state
                .zone_rects
                .iter()
                .find(|(_, rect)| rect.contains(pos))
                .map(|(key, _)| key.clone())
        });

        if dropped.is_empty() {
            for key in self.controller.zones().to_vec() {
                let over = hovering && under_pointer.as_deref() == Some(key.as_str());
                if over && !self.controller.is_drag_active(&key) {
                    self.controller.on_drag_enter(&key);
                } else if !over && self.controller.is_drag_active(&key) {
                    self.controller.on_drag_leave(&key);
                }
            }
            return;
        }

        // Some platforms stop reporting the pointer during an OS drag, so
        // fall back to the zone that was last highlighted.
        let target = under_pointer.or_else(|| {
            self.controller
                .zones()
                .iter()
                .find(|key| self.controller.is_drag_active(key))
                .cloned()
        });
        for key in self.controller.zones().to_vec() {
            if Some(&key) != target.as_ref() {
                self.controller.on_drag_leave(&key);
            }
        }

        let Some(key) = target else {
            log::debug!("Ignoring {} file(s) dropped outside the zones", dropped.len());
            return;
        };
        if self.state.is_uploading {
            log::info!("Ignoring drop on {key} while uploading");
            self.controller.on_drag_leave(&key);
            return;
        }

        let mut files = Vec::new();
        let mut unreadable = None;
        for file in &dropped {
            match Self::dropped_file(file) {
                Ok(Some(file)) => files.push(file),
                Ok(None) => log::warn!("Dropped item '{}' carries no data", file.name),
                Err(e) => {
                    log::error!("{e}");
                    unreadable.get_or_insert(e);
                }
            }
        }
        match unreadable {
            Some(e) if files.is_empty() => {
                self.controller.on_drag_leave(&key);
                self.controller.report_error(&e);
            }
            _ => self.controller.on_dropped(&key, files),
        }
    }

    pub fn start_upload(&mut self, ctx: &egui::Context) {
        let batch = match self.controller.prepare_batch() {
            Ok(batch) => batch,
            Err(e) => {
                log::debug!("Upload not started: {e}");
                return;
            }
        };

        let (event_sender, event_receiver) = std_mpsc::channel();
        let (prompt_sender, prompt_receiver) = std_mpsc::channel();
        let (outcome_sender, outcome_receiver) = std_mpsc::channel();
        self.state
            .begin(batch.len(), event_receiver, prompt_receiver, outcome_receiver);

        let server = self.server.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Runtime::new() {
                Ok(rt) => {
                    let mut prompt = ChannelPrompt::new(prompt_sender, ctx.clone());
                    let mut sink = event_sender;
                    rt.block_on(run_batch(&batch, &server, &mut prompt, &mut sink))
                }
                Err(e) => BatchOutcome::Aborted {
                    uploaded: Vec::new(),
                    error: UploadError::Runtime(e),
                },
            };
            outcome_sender.send(outcome).unwrap_or_default();
            ctx.request_repaint();
        });
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.state.is_uploading {
            ctx.request_repaint();
        }

        if self.state.pending_prompt.is_none() {
            if let Some(receiver) = &self.state.prompt_receiver {
                if let Ok(request) = receiver.try_recv() {
                    self.state.pending_prompt = Some(request);
                }
            }
        }

        // Take the outcome before draining events: everything the worker
        // published was sent before it.
        let outcome = match &self.state.outcome_receiver {
            Some(receiver) => match receiver.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(BatchOutcome::Aborted {
                    uploaded: Vec::new(),
                    error: UploadError::WorkerStopped,
                }),
            },
            None => None,
        };

        let events: Vec<UploadEvent> = match &self.state.event_receiver {
            Some(receiver) => receiver.try_iter().collect(),
            None => Vec::new(),
        };
        for event in events {
            self.state.record(&event);
            if let UploadEvent::File(file) = &event {
                if file.status == UploadStatus::Success {
                    self.state.last_uploaded = Some(self.server.image_url(&file.name).to_string());
                }
            }
            self.controller.publish(event);
        }

        if let Some(outcome) = outcome {
            self.controller.finish_batch(&outcome);
            self.state.finish(&outcome);
        }
    }

    pub fn answer_prompt(&mut self, overwrite: bool) {
        if let Some(request) = self.state.pending_prompt.take() {
            request.answer(overwrite);
        }
    }
}

impl App for LogoUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.handle_drag_and_drop(ctx);
        self.render(ctx);
    }
}
