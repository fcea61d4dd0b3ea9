//! Remote filename rules and the suffix gate.

use crate::config::SuffixGatePolicy;
use crate::error::UploadError;

/// Characters allowed in a suffix as-is; everything else becomes `_`.
fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

pub fn sanitize_suffix(suffix: &str) -> String {
    suffix
        .chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .collect()
}

/// `<key><sanitized suffix>.png`
pub fn target_filename(key: &str, sanitized_suffix: &str) -> String {
    format!("{key}{sanitized_suffix}.png")
}

pub fn overwrite_prompt(filename: &str) -> String {
    format!("File \"{filename}\" already exists on the server. Overwrite?")
}

/// Length in UTF-16 code units.
fn suffix_len(suffix: &str) -> usize {
    suffix.encode_utf16().count()
}

/// Trim the raw suffix and check its length.
pub fn validate_suffix(raw: &str, min_len: usize) -> Result<&str, UploadError> {
    let suffix = raw.trim();
    if suffix.is_empty() || suffix_len(suffix) < min_len {
        return Err(UploadError::MissingSuffix { min_len });
    }
    Ok(suffix)
}

/// Enabled state and tooltip of the upload button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixGate {
    pub enabled: bool,
    pub tooltip: Option<String>,
}

pub fn is_upload_enabled(suffix: &str, min_len: usize) -> bool {
    suffix_len(suffix.trim()) >= min_len
}

pub fn evaluate_gate(suffix: &str, policy: SuffixGatePolicy, min_len: usize) -> SuffixGate {
    let enabled = match policy {
        SuffixGatePolicy::AlwaysEnabled => true,
        SuffixGatePolicy::MinLength => is_upload_enabled(suffix, min_len),
    };
    SuffixGate {
        enabled,
        tooltip: (!enabled)
            .then(|| format!("Enter at least {min_len} characters in Filename suffix")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_disallowed_characters() {
        assert_eq!(sanitize_suffix("ab_12!"), "ab_12_");
        assert_eq!(sanitize_suffix("v1.2-final"), "v1.2-final");
        assert_eq!(sanitize_suffix("a b/c"), "a_b_c");
        assert_eq!(sanitize_suffix("é2026"), "_2026");
    }

    #[test]
    fn filename_is_key_then_suffix() {
        assert_eq!(target_filename("logo", &sanitize_suffix("ab_12!")), "logoab_12_.png");
    }

    #[test]
    fn suffix_validation_trims_and_counts() {
        assert_eq!(validate_suffix("  2026 ", 4).unwrap(), "2026");
        for short in ["", "   ", "a", "ab", " abc "] {
            assert!(
                matches!(
                    validate_suffix(short, 4),
                    Err(UploadError::MissingSuffix { min_len: 4 })
                ),
                "{short:?} should be rejected"
            );
        }
    }

    #[test]
    fn suffix_length_counts_utf16_units() {
        assert_eq!(validate_suffix("ab😀", 4).unwrap(), "ab😀");
        assert!(is_upload_enabled("ab😀", 4));
        assert!(validate_suffix("abé", 4).is_err());
        assert!(!is_upload_enabled("abé", 4));
    }

    #[test]
    fn gate_always_enabled_ignores_length() {
        let gate = evaluate_gate("", SuffixGatePolicy::AlwaysEnabled, 4);
        assert!(gate.enabled);
        assert_eq!(gate.tooltip, None);
    }

    #[test]
    fn gate_min_length_disables_short_suffix() {
        let gate = evaluate_gate(" abc ", SuffixGatePolicy::MinLength, 4);
        assert!(!gate.enabled);
        assert_eq!(
            gate.tooltip.as_deref(),
            Some("Enter at least 4 characters in Filename suffix")
        );

        let gate = evaluate_gate("abcd", SuffixGatePolicy::MinLength, 4);
        assert!(gate.enabled);
        assert_eq!(gate.tooltip, None);
    }

    #[test]
    fn prompt_names_the_file() {
        assert_eq!(
            overwrite_prompt("game-logo2026.png"),
            "File \"game-logo2026.png\" already exists on the server. Overwrite?"
        );
    }
}
