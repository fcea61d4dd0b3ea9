pub struct FileSizeUtils;

impl FileSizeUtils {
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let mut size = size as f64;
        let mut unit = UNITS[0];

        for next in &UNITS[1..] {
            if size < 1024.0 {
                break;
            }
            size /= 1024.0;
            unit = *next;
        }

        if unit == UNITS[0] {
            format!("{} {}", size as u64, unit)
        } else {
            format!("{:.1} {}", size, unit)
        }
    }
}
