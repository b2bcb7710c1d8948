//! Filename-safe token normalization.

/// Trim, turn internal whitespace into `_`, then drop everything outside
/// `[A-Za-z0-9_-]`.
///
/// Total and idempotent; may return an empty string.
pub fn sanitize(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_underscores() {
        assert_eq!(sanitize("  Mary Ann  "), "Mary_Ann");
        assert_eq!(sanitize("Varsity\tGirls"), "Varsity_Girls");
    }

    #[test]
    fn strips_punctuation_and_non_ascii() {
        assert_eq!(sanitize("O'Neil"), "ONeil");
        assert_eq!(sanitize("Zoë-Lynn"), "Zo-Lynn");
        assert_eq!(sanitize("#12"), "12");
    }

    #[test]
    fn empty_and_symbol_only_inputs() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("   "), "");
        assert_eq!(sanitize("!!!"), "");
    }

    #[test]
    fn idempotent() {
        for input in ["  a b  c ", "Zoë", "x__y", "-_-", "J. R. R.", "\u{00a0}lead"] {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "input {input:?}");
        }
    }
}
