use eframe::egui::Color32;

pub trait ColorExt {
    /// Parse a CSS hex color, `#rgb` or `#rrggbb`, leading `#` optional.
    fn parse_css_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn parse_css_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
        match hex.len() {
            3 => {
                // #f66 is #ff6666
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Some(Color32::from_rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = channel(&hex[0..2])?;
                let g = channel(&hex[2..4])?;
                let b = channel(&hex[4..6])?;
                Some(Color32::from_rgb(r, g, b))
            }
            _ => None,
        }
    }
}
