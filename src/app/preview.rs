use crate::controller::PreviewSurface;
use crate::upload::SelectedFile;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use std::collections::HashMap;

/// Previews backed by egui textures. Dropping a handle frees the texture.
pub struct TexturePreviews {
    ctx: egui::Context,
    textures: HashMap<String, TextureHandle>,
}

impl TexturePreviews {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            textures: HashMap::new(),
        }
    }

    pub fn texture(&self, key: &str) -> Option<&TextureHandle> {
        self.textures.get(key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

pub fn decode_png(bytes: &[u8]) -> Result<ColorImage, image::ImageError> {
    let rgba = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

impl PreviewSurface for TexturePreviews {
    fn show(&mut self, key: &str, file: &SelectedFile) {
        match decode_png(&file.bytes) {
            Ok(image) => {
                let texture =
                    self.ctx
                        .load_texture(format!("preview-{key}"), image, TextureOptions::LINEAR);
                self.textures.insert(key.to_string(), texture);
            }
            Err(e) => log::warn!("No preview for {}: {e}", file.name),
        }
    }

    fn release(&mut self, key: &str) {
        self.textures.remove(key);
    }
}
