//! The upload widget controller.
//!
//! Owns the drop zones, the selection map, the suffix and the status line.
//! UI code feeds it events through [`WidgetEvents`] and triggers uploads
//! with [`UploadController::submit_all`] (or the split
//! `prepare_batch`/`finish_batch` pair when the batch runs elsewhere).

use crate::config::{SuffixGatePolicy, UploaderConfig};
use crate::error::UploadError;
use crate::upload::{
    evaluate_gate, run_batch, sanitize_suffix, validate_suffix, BatchOutcome, ImageServer,
    OverwritePrompt, SelectedFile, StatusMessage, StatusSink, SuffixGate, UploadBatch,
    UploadEvent,
};
use std::collections::{BTreeMap, BTreeSet};

/// Where previews of selected files are drawn.
pub trait PreviewSurface {
    fn show(&mut self, key: &str, file: &SelectedFile);
    /// Free the preview for `key`. Called before every replacement.
    fn release(&mut self, key: &str);
}

/// UI callbacks, one method per kind of user interaction.
pub trait WidgetEvents {
    fn on_suffix_changed(&mut self, suffix: &str) -> SuffixGate;
    fn on_file_chosen(&mut self, key: &str, file: SelectedFile);
    /// Only the first dropped file is used.
    fn on_dropped(&mut self, key: &str, files: Vec<SelectedFile>);
    fn on_drag_enter(&mut self, key: &str);
    fn on_drag_leave(&mut self, key: &str);
}

pub struct UploadController<P: PreviewSurface> {
    zones: Vec<String>,
    suffix: String,
    gate_policy: SuffixGatePolicy,
    min_suffix_len: usize,
    gate: SuffixGate,
    selections: BTreeMap<String, SelectedFile>,
    drag_active: BTreeSet<String>,
    previews: P,
    status: Option<StatusMessage>,
    focus_suffix: bool,
}

impl<P: PreviewSurface> UploadController<P> {
    pub fn new(config: &UploaderConfig, previews: P) -> Self {
        let gate = evaluate_gate("", config.suffix_gate, config.min_suffix_len);
        Self {
            zones: config.zone_keys(),
            suffix: String::new(),
            gate_policy: config.suffix_gate,
            min_suffix_len: config.min_suffix_len,
            gate,
            selections: BTreeMap::new(),
            drag_active: BTreeSet::new(),
            previews,
            status: None,
            focus_suffix: false,
        }
    }

    pub fn zones(&self) -> &[String] {
        &self.zones
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn gate(&self) -> &SuffixGate {
        &self.gate
    }

    pub fn is_upload_enabled(&self) -> bool {
        self.gate.enabled
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn selection(&self, key: &str) -> Option<&SelectedFile> {
        self.selections.get(key)
    }

    pub fn selection_count(&self) -> usize {
        self.selections.len()
    }

    pub fn is_drag_active(&self, key: &str) -> bool {
        self.drag_active.contains(key)
    }

    pub fn previews(&self) -> &P {
        &self.previews
    }

    /// Returns true once after a failed submit asked for the suffix field.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_suffix)
    }

    fn set_status(&mut self, status: StatusMessage) {
        if status.is_error() {
            log::warn!("{}", status.text);
        } else {
            log::info!("{}", status.text);
        }
        self.status = Some(status);
    }

    /// Show an error that happened before a file reached the controller,
    /// such as a picked file that could not be read.
    pub fn report_error(&mut self, error: &UploadError) {
        self.set_status(StatusMessage::error(error.to_string()));
    }

    fn refresh_gate(&mut self) {
        self.gate = evaluate_gate(&self.suffix, self.gate_policy, self.min_suffix_len);
    }

    /// Accept `file` for zone `key` if it is a PNG.
    pub fn handle_file(&mut self, key: &str, file: SelectedFile) {
        if !self.zones.iter().any(|zone| zone == key) {
            log::warn!("Ignoring {} for unknown drop zone '{key}'", file.name);
            return;
        }
        if !file.is_png() {
            let error = UploadError::InvalidFileType { name: file.name };
            self.set_status(StatusMessage::error(error.to_string()));
            return;
        }

        if self.selections.contains_key(key) {
            self.previews.release(key);
        }
        self.previews.show(key, &file);
        let message = format!("{} selected for {key}", file.name);
        self.selections.insert(key.to_string(), file);
        self.set_status(StatusMessage::info(message));
    }

    /// Check the submit preconditions and snapshot the selection.
    ///
    /// On failure the status line already carries the error.
    pub fn prepare_batch(&mut self) -> Result<UploadBatch, UploadError> {
        let suffix = match validate_suffix(&self.suffix, self.min_suffix_len) {
            Ok(suffix) => sanitize_suffix(suffix),
            Err(e) => {
                self.focus_suffix = true;
                self.refresh_gate();
                self.set_status(StatusMessage::error(e.to_string()));
                return Err(e);
            }
        };

        if self.selections.is_empty() {
            let e = UploadError::NoFilesSelected;
            self.set_status(StatusMessage::error(e.to_string()));
            return Err(e);
        }

        let entries = self
            .selections
            .iter()
            .map(|(key, file)| (key.clone(), file.clone()))
            .collect();
        Ok(UploadBatch::new(suffix, entries))
    }

    /// Apply the end of a batch. A completed batch clears every zone,
    /// skipped ones included; an aborted one leaves everything in place.
    pub fn finish_batch(&mut self, outcome: &BatchOutcome) {
        match outcome {
            BatchOutcome::Completed { uploaded, skipped } => {
                log::debug!(
                    "Batch done: {} uploaded, {} skipped",
                    uploaded.len(),
                    skipped.len()
                );
                for key in std::mem::take(&mut self.selections).into_keys() {
                    self.previews.release(&key);
                }
                self.set_status(StatusMessage::info("All uploads complete"));
            }
            BatchOutcome::Aborted { error, .. } => {
                self.set_status(StatusMessage::error(error.to_string()));
            }
        }
    }

    /// Run a whole upload pass on the current task.
    pub async fn submit_all(
        &mut self,
        server: &ImageServer,
        prompt: &mut impl OverwritePrompt,
    ) -> Result<BatchOutcome, UploadError> {
        let batch = self.prepare_batch()?;
        let outcome = run_batch(&batch, server, prompt, &mut *self).await;
        self.finish_batch(&outcome);
        Ok(outcome)
    }
}

impl<P: PreviewSurface> StatusSink for UploadController<P> {
    fn publish(&mut self, event: UploadEvent) {
        if let UploadEvent::Status(status) = event {
            self.set_status(status);
        }
    }
}

impl<P: PreviewSurface> WidgetEvents for UploadController<P> {
    fn on_suffix_changed(&mut self, suffix: &str) -> SuffixGate {
        self.suffix = suffix.to_string();
        self.refresh_gate();
        self.gate.clone()
    }

    fn on_file_chosen(&mut self, key: &str, file: SelectedFile) {
        self.handle_file(key, file);
    }

    fn on_dropped(&mut self, key: &str, files: Vec<SelectedFile>) {
        self.drag_active.remove(key);
        if let Some(file) = files.into_iter().next() {
            self.handle_file(key, file);
        }
    }

    fn on_drag_enter(&mut self, key: &str) {
        self.drag_active.insert(key.to_string());
    }

    fn on_drag_leave(&mut self, key: &str) {
        self.drag_active.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::Severity;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingPreviews {
        live: BTreeSet<String>,
        released: Vec<String>,
    }

    impl PreviewSurface for RecordingPreviews {
        fn show(&mut self, key: &str, _file: &SelectedFile) {
            assert!(
                self.live.insert(key.to_string()),
                "preview for {key} shown before the old one was released"
            );
        }

        fn release(&mut self, key: &str) {
            assert!(self.live.remove(key), "released a preview that was not shown");
            self.released.push(key.to_string());
        }
    }

    fn config_for(uri: &str) -> UploaderConfig {
        UploaderConfig {
            server_url: uri.to_string(),
            zones: vec![
                crate::config::ZoneConfig::new("logo", "Logo"),
                crate::config::ZoneConfig::new("banner", "Banner"),
            ],
            ..Default::default()
        }
    }

    fn controller() -> UploadController<RecordingPreviews> {
        UploadController::new(&config_for("http://localhost:8080"), RecordingPreviews::default())
    }

    fn png(name: &str) -> SelectedFile {
        SelectedFile::new(name, format!("bytes of {name}").into_bytes())
    }

    fn status_text<P: PreviewSurface>(controller: &UploadController<P>) -> &str {
        controller.status().map(|s| s.text.as_str()).unwrap_or_default()
    }

    #[test]
    fn rejects_non_png_names() {
        let mut c = controller();
        for name in ["logo.jpg", "logo.png.txt", "png", "logo"] {
            c.on_file_chosen("logo", png(name));
            assert_eq!(c.selection_count(), 0, "{name} should be rejected");
            let status = c.status().unwrap();
            assert_eq!(status.severity, Severity::Error);
            assert_eq!(status.text, "Only PNG files allowed");
        }
        assert!(c.previews().live.is_empty());
    }

    #[test]
    fn png_extension_check_ignores_case() {
        let mut c = controller();
        c.on_file_chosen("logo", png("Team.PNG"));
        assert_eq!(c.selection("logo").unwrap().name, "Team.PNG");
        assert_eq!(status_text(&c), "Team.PNG selected for logo");
        assert!(!c.status().unwrap().is_error());
    }

    #[test]
    fn reselecting_a_zone_releases_the_old_preview() {
        let mut c = controller();
        c.on_file_chosen("logo", png("first.png"));
        c.on_file_chosen("logo", png("second.png"));

        assert_eq!(c.selection_count(), 1);
        assert_eq!(c.selection("logo").unwrap().name, "second.png");
        assert_eq!(c.previews().released, vec!["logo".to_string()]);
        assert_eq!(c.previews().live.len(), 1);
    }

    #[test]
    fn rejected_file_keeps_previous_selection() {
        let mut c = controller();
        c.on_file_chosen("logo", png("first.png"));
        c.on_file_chosen("logo", png("second.gif"));
        assert_eq!(c.selection("logo").unwrap().name, "first.png");
        assert!(c.previews().released.is_empty());
    }

    #[test]
    fn unknown_zone_is_ignored() {
        let mut c = controller();
        c.on_file_chosen("nope", png("x.png"));
        assert_eq!(c.selection_count(), 0);
        assert!(c.status().is_none());
    }

    #[test]
    fn drag_state_is_per_zone() {
        let mut c = controller();
        c.on_drag_enter("logo");
        c.on_drag_enter("banner");
        c.on_drag_leave("banner");
        assert!(c.is_drag_active("logo"));
        assert!(!c.is_drag_active("banner"));

        c.on_dropped("logo", vec![png("a.png"), png("b.png")]);
        assert!(!c.is_drag_active("logo"));
        assert_eq!(c.selection("logo").unwrap().name, "a.png");
    }

    #[test]
    fn empty_drop_only_clears_drag_state() {
        let mut c = controller();
        c.on_drag_enter("logo");
        c.on_dropped("logo", Vec::new());
        assert!(!c.is_drag_active("logo"));
        assert_eq!(c.selection_count(), 0);
    }

    #[test]
    fn gate_follows_configured_policy() {
        let mut c = controller();
        assert!(c.is_upload_enabled());
        assert!(c.on_suffix_changed("ab").enabled);

        let config = UploaderConfig {
            suffix_gate: SuffixGatePolicy::MinLength,
            ..config_for("http://localhost:8080")
        };
        let mut strict = UploadController::new(&config, RecordingPreviews::default());
        assert!(!strict.is_upload_enabled());
        assert!(!strict.on_suffix_changed(" abc ").enabled);
        assert!(strict.on_suffix_changed("abcd").enabled);
        assert_eq!(strict.suffix(), "abcd");
    }

    async fn silent_server() -> MockServer {
        let mock = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock)
            .await;
        mock
    }

    #[tokio::test]
    async fn short_suffix_blocks_submit_without_requests() {
        let mock = silent_server().await;
        let config = config_for(&mock.uri());
        let server = ImageServer::new(&config).unwrap();
        let mut c = UploadController::new(&config, RecordingPreviews::default());
        c.on_file_chosen("logo", png("x.png"));

        for suffix in ["", "   ", "a", "ab", " abc "] {
            c.on_suffix_changed(suffix);
            let err = c.submit_all(&server, &mut |_: &str| true).await.unwrap_err();
            assert!(matches!(err, UploadError::MissingSuffix { .. }));
            assert_eq!(
                status_text(&c),
                "Filename suffix is required and must be at least 4 characters."
            );
            assert!(c.take_focus_request());
            assert!(!c.take_focus_request());
        }
        assert_eq!(c.selection_count(), 1);
    }

    #[tokio::test]
    async fn empty_selection_blocks_submit_without_requests() {
        let mock = silent_server().await;
        let config = config_for(&mock.uri());
        let server = ImageServer::new(&config).unwrap();
        let mut c = UploadController::new(&config, RecordingPreviews::default());
        c.on_suffix_changed("2026");

        let err = c.submit_all(&server, &mut |_: &str| true).await.unwrap_err();
        assert!(matches!(err, UploadError::NoFilesSelected));
        assert_eq!(status_text(&c), "No files selected to upload");
        assert!(c.status().unwrap().is_error());
        assert!(!c.take_focus_request());
    }

    #[tokio::test]
    async fn completed_batch_clears_selection_and_previews() {
        let mock = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&mock)
            .await;
        Mock::given(method("POST"))
            .and(path("/freezy/upload/image"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&mock)
            .await;

        let config = config_for(&mock.uri());
        let server = ImageServer::new(&config).unwrap();
        let mut c = UploadController::new(&config, RecordingPreviews::default());
        c.on_file_chosen("logo", png("a.png"));
        c.on_file_chosen("banner", png("b.png"));
        c.on_suffix_changed(" team 254 ");

        let outcome = c.submit_all(&server, &mut |_: &str| true).await.unwrap();

        assert!(outcome.is_completed());
        assert_eq!(c.selection_count(), 0);
        assert!(c.previews().live.is_empty());
        assert_eq!(status_text(&c), "All uploads complete");

        let requests = mock.received_requests().await.unwrap();
        let checked: Vec<_> = requests
            .iter()
            .filter(|r| r.method.as_str() == "HEAD")
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(
            checked,
            vec![
                "/static/img/bannerteam_254.png".to_string(),
                "/static/img/logoteam_254.png".to_string(),
            ]
        );
    }

    async fn logo_absent_banner_present() -> MockServer {
        let mock = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/static/img/banner2026.png"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/static/img/logo2026.png"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock)
            .await;
        Mock::given(method("POST"))
            .and(path("/freezy/upload/image"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock)
            .await;
        mock
    }

    #[tokio::test]
    async fn declined_entry_stays_selected_while_the_batch_runs() {
        let mock = logo_absent_banner_present().await;
        let config = config_for(&mock.uri());
        let server = ImageServer::new(&config).unwrap();
        let mut c = UploadController::new(&config, RecordingPreviews::default());
        c.on_file_chosen("logo", png("a.png"));
        c.on_file_chosen("banner", png("b.png"));
        c.on_suffix_changed("2026");

        let batch = c.prepare_batch().unwrap();
        let outcome = run_batch(&batch, &server, &mut |_: &str| false, &mut c).await;

        assert_eq!(outcome.uploaded(), ["logo".to_string()]);
        assert_eq!(status_text(&c), "Uploaded logo2026.png");
        assert_eq!(c.selection("banner").unwrap().name, "b.png");
        assert_eq!(c.selection_count(), 2);
        assert!(c.previews().released.is_empty());
    }

    #[tokio::test]
    async fn completed_batch_with_a_skip_still_clears_everything() {
        let mock = logo_absent_banner_present().await;
        let config = config_for(&mock.uri());
        let server = ImageServer::new(&config).unwrap();
        let mut c = UploadController::new(&config, RecordingPreviews::default());
        c.on_file_chosen("logo", png("a.png"));
        c.on_file_chosen("banner", png("b.png"));
        c.on_suffix_changed("2026");

        let outcome = c.submit_all(&server, &mut |_: &str| false).await.unwrap();

        match &outcome {
            BatchOutcome::Completed { uploaded, skipped } => {
                assert_eq!(uploaded, &vec!["logo".to_string()]);
                assert_eq!(skipped, &vec!["banner".to_string()]);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(c.selection_count(), 0);
        assert!(c.previews().live.is_empty());
        assert_eq!(c.previews().released.len(), 2);
        assert_eq!(status_text(&c), "All uploads complete");
    }

    #[test]
    fn unreadable_file_is_reported_on_the_status_line() {
        let mut c = controller();
        c.on_file_chosen("logo", png("kept.png"));

        let missing = std::path::Path::new("/definitely/not/here/logo.png");
        let err = SelectedFile::from_path(missing).unwrap_err();
        c.report_error(&err);

        let status = c.status().unwrap();
        assert!(status.is_error());
        assert!(status.text.starts_with("Unable to read"), "{}", status.text);
        assert_eq!(c.selection("logo").unwrap().name, "kept.png");
    }

    #[tokio::test]
    async fn aborted_batch_leaves_selection_alone() {
        let mock = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .expect(1)
            .mount(&mock)
            .await;

        let config = config_for(&mock.uri());
        let server = ImageServer::new(&config).unwrap();
        let mut c = UploadController::new(&config, RecordingPreviews::default());
        c.on_file_chosen("logo", png("a.png"));
        c.on_file_chosen("banner", png("b.png"));
        c.on_suffix_changed("2026");

        let outcome = c.submit_all(&server, &mut |_: &str| true).await.unwrap();

        assert!(!outcome.is_completed());
        assert_eq!(c.selection_count(), 2);
        assert_eq!(c.previews().live.len(), 2);
        let status = c.status().unwrap();
        assert!(status.is_error());
        assert_eq!(status.text, "Upload failed for banner2026.png: 413 too large");
    }

    #[tokio::test]
    async fn network_failure_reports_network_error() {
        let config = config_for("http://127.0.0.1:9");
        let server = ImageServer::new(&config).unwrap();
        let mut c = UploadController::new(&config, RecordingPreviews::default());
        c.on_file_chosen("logo", png("a.png"));
        c.on_suffix_changed("2026");

        let outcome = c.submit_all(&server, &mut |_: &str| true).await.unwrap();

        assert!(!outcome.is_completed());
        assert_eq!(status_text(&c), "Network error uploading logo2026.png");
        assert_eq!(c.selection_count(), 1);
    }
}
