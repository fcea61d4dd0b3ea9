use eframe::egui;
use logo_uploader::upload::ImageServer;
use logo_uploader::{LogoUploader, UploaderConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = UploaderConfig::load_default();
    let level = loaded
        .as_ref()
        .map(|config| config.log_level)
        .unwrap_or_default();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_filter()))
        .init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}; falling back to defaults");
            UploaderConfig::default()
        }
    };
    let server = ImageServer::new(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 760.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Logo Uploader",
        options,
        Box::new(move |cc| Box::new(LogoUploader::new(cc, config, server))),
    )?;
    Ok(())
}
