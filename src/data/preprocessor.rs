// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans raw corpus text before tokenisation. Parallel corpora
// collected from the web carry non-breaking spaces, zero-width
// spaces, stray control characters and doubled-up whitespace;
// left alone they end up as junk vocabulary entries.
//
// Cleaning steps (applied in order):
//   1. Replace Unicode whitespace variants with plain space
//   2. Remove invisible control characters
//   3. Collapse runs of spaces into one
//   4. Trim leading/trailing whitespace

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one sentence for downstream tokenisation.
    pub fn clean(&self, text: &str) -> String {
        let normalised: String = text
            .chars()
            .map(|c| match c {
                '\t' => ' ',
                // Non-breaking space
                '\u{00A0}' => ' ',
                // Zero-width space
                '\u{200B}' => ' ',
                // Byte order mark
                '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        // Collapse whitespace runs; split_whitespace also trims the ends.
        normalised.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  guten   morgen \t welt "), "guten morgen welt");
    }

    #[test]
    fn test_strips_unicode_oddities() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("a\u{00A0}b\u{200B}c\rd"), "a b c d");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("good morning"), "good morning");
    }
}
