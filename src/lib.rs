//! Desktop uploader for logo PNGs.
//!
//! Files are dropped on labeled zones, renamed to `<zone><suffix>.png` and
//! posted one by one to the image upload endpoint, asking before anything
//! already on the server is replaced.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod upload;
pub mod utils;

pub use app::LogoUploader;
pub use config::UploaderConfig;
pub use controller::{PreviewSurface, UploadController, WidgetEvents};
pub use error::{ConfigError, UploadError};
