use crate::config::UploaderConfig;
use crate::error::{ConfigError, UploadError};
use crate::upload::types::{SelectedFile, UploadReceipt};
use reqwest::header::CACHE_CONTROL;
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};

/// Join `path` below the path of `base`, keeping any prefix such as
/// `http://host/arena/`.
fn join_under(base: &Url, path: &str) -> Result<Url, String> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path.trim_start_matches('/')).map_err(|e| e.to_string())
}

/// HTTP side of the uploader: existence probes and multipart uploads.
#[derive(Clone)]
pub struct ImageServer {
    client: reqwest::Client,
    upload_url: Url,
    image_base: Url,
}

impl ImageServer {
    pub fn new(config: &UploaderConfig) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: config.server_url.clone(),
            reason,
        };

        let base = Url::parse(&config.server_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }
        let upload_url = join_under(&base, &config.upload_path).map_err(invalid)?;
        let image_base = join_under(&base, &config.image_path).map_err(invalid)?;

        Ok(Self {
            client: reqwest::Client::new(),
            upload_url,
            image_base,
        })
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    /// Public URL of an uploaded image. The filename is percent-encoded as a
    /// single path segment.
    pub fn image_url(&self, filename: &str) -> Url {
        let mut url = self.image_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(filename);
        }
        url
    }

    /// Probe whether `filename` is already served.
    ///
    /// 200 means it exists, 404 means it does not, anything else counts as
    /// existing only when it is a 2xx.
    pub async fn exists(&self, filename: &str) -> Result<bool, UploadError> {
        let url = self.image_url(filename);
        let response = self
            .client
            .head(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|source| UploadError::ExistenceCheckTransport {
                filename: filename.to_string(),
                source,
            })?;

        let exists = match response.status() {
            StatusCode::OK => true,
            StatusCode::NOT_FOUND => false,
            other => other.is_success(),
        };
        log::debug!("HEAD {filename}: {} (exists: {exists})", response.status());
        Ok(exists)
    }

    /// Send `file` as the multipart field `file` under `filename`.
    pub async fn upload(
        &self,
        filename: &str,
        file: &SelectedFile,
    ) -> Result<UploadReceipt, UploadError> {
        let transport = |source| UploadError::UploadTransport {
            filename: filename.to_string(),
            source,
        };

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(&file.mime)
            .map_err(transport)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => text,
                Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
            };
            return Err(UploadError::UploadRejected {
                filename: filename.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.unwrap_or_default();
        let receipt = serde_json::from_str::<UploadReceipt>(&body).unwrap_or_default();
        Ok(receipt)
    }
}
