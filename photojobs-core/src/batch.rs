//! Camera/setup batch classification.
//!
//! Camera exports are named `<letters><2-digit setup><sequence>`
//! (`JS106537.jpg`). Anything else, including already-renamed files, is
//! [`BatchId::UNKNOWN`].

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::BatchId;

fn batch_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]+[0-9]{2})").expect("static regex"))
}

/// Derive the batch identifier from a filename or path.
pub fn classify_batch(filename: &str) -> BatchId {
    let stem = Path::new(filename.trim())
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    batch_pattern()
        .captures(&stem)
        .and_then(|c| c.get(1))
        .map(|m| BatchId::from(m.as_str()))
        .unwrap_or_else(BatchId::unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_export_yields_prefix() {
        assert_eq!(classify_batch("JS106537.jpg").0, "JS10");
        assert_eq!(classify_batch("JS101234.jpg").0, "JS10");
        assert_eq!(classify_batch("ABC22001.JPG").0, "ABC22");
    }

    #[test]
    fn renamed_file_is_unknown() {
        assert!(classify_batch("Allen_Brielle_6537_3.jpg").is_unknown());
        assert!(classify_batch("6537.jpg").is_unknown());
        assert!(classify_batch("").is_unknown());
    }

    #[test]
    fn single_digit_setup_is_unknown() {
        assert!(classify_batch("JS1_Allen.jpg").is_unknown());
    }

    #[test]
    fn directories_are_ignored() {
        assert_eq!(classify_batch("day2/JS206537.jpg").0, "JS20");
    }
}
