use crate::upload::OverwritePrompt;
use eframe::egui;
use std::sync::mpsc::{channel, Sender};

/// An overwrite question waiting for the UI.
pub struct PromptRequest {
    pub message: String,
    reply: Sender<bool>,
}

impl PromptRequest {
    pub fn answer(self, overwrite: bool) {
        self.reply.send(overwrite).unwrap_or_default();
    }
}

/// Forwards overwrite questions from the worker thread to the UI thread and
/// blocks until the modal is answered.
pub struct ChannelPrompt {
    requests: Sender<PromptRequest>,
    ctx: egui::Context,
}

impl ChannelPrompt {
    pub fn new(requests: Sender<PromptRequest>, ctx: egui::Context) -> Self {
        Self { requests, ctx }
    }
}

impl OverwritePrompt for ChannelPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        let (reply, answer) = channel();
        let request = PromptRequest {
            message: message.to_string(),
            reply,
        };
        if self.requests.send(request).is_err() {
            log::warn!("UI is gone, skipping: {message}");
            return false;
        }
        self.ctx.request_repaint();

        // A dropped request counts as "skip"
        answer.recv().unwrap_or(false)
    }
}
