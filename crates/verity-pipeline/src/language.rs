//! Script-based language detection
//!
//! Claims arrive in English and in the major Indic scripts. Each Indic
//! script maps to one language tag; anything else is reported as the
//! default language.

use verity_domain::traits::LanguageDetector;

const SCRIPTS: [(char, char, &str); 5] = [
    ('\u{0900}', '\u{097F}', "hi"),
    ('\u{0B80}', '\u{0BFF}', "ta"),
    ('\u{0C00}', '\u{0C7F}', "te"),
    ('\u{0C80}', '\u{0CFF}', "kn"),
    ('\u{0D00}', '\u{0D7F}', "ml"),
];

/// Detects language from the dominant Unicode script
#[derive(Debug, Clone)]
pub struct ScriptLanguageDetector {
    default_language: String,
}

impl ScriptLanguageDetector {
    /// Create a detector falling back to `default_language`
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
        }
    }
}

impl Default for ScriptLanguageDetector {
    fn default() -> Self {
        Self::new("en")
    }
}

impl LanguageDetector for ScriptLanguageDetector {
    fn detect(&self, text: &str) -> String {
        let mut counts = [0usize; SCRIPTS.len()];
        let mut other_letters = 0usize;

        for c in text.chars() {
            match SCRIPTS.iter().position(|(lo, hi, _)| (*lo..=*hi).contains(&c)) {
                Some(i) => counts[i] += 1,
                None if c.is_alphabetic() => other_letters += 1,
                None => {}
            }
        }

        // Ties between scripts go to the earlier entry in SCRIPTS
        let (best, count) = counts
            .iter()
            .enumerate()
            .fold((0, 0), |acc, (i, &n)| if n > acc.1 { (i, n) } else { acc });

        if count > 0 && count >= other_letters {
            SCRIPTS[best].2.to_string()
        } else {
            self.default_language.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_indic_scripts() {
        let detector = ScriptLanguageDetector::default();
        assert_eq!(detector.detect("இலவச மின்சாரம்"), "ta");
        assert_eq!(detector.detect("मुफ्त बिजली"), "hi");
        assert_eq!(detector.detect("ఉచిత విద్యుత్"), "te");
        assert_eq!(detector.detect("ಉಚಿತ ವಿದ್ಯುತ್"), "kn");
        assert_eq!(detector.detect("സൗജന്യ വൈദ്യുതി"), "ml");
    }

    #[test]
    fn test_defaults() {
        let detector = ScriptLanguageDetector::default();
        assert_eq!(detector.detect("Free electricity for everyone"), "en");
        assert_eq!(detector.detect(""), "en");
        assert_eq!(detector.detect("12345 !!"), "en");
        assert_eq!(ScriptLanguageDetector::new("hi").detect("hello"), "hi");
    }

    #[test]
    fn test_mixed_text_uses_dominant_script() {
        let detector = ScriptLanguageDetector::default();
        assert_eq!(detector.detect("PM மோடி இலவச மின்சாரம் அறிவித்தார்"), "ta");
        assert_eq!(detector.detect("The PM said இலவச in a long English sentence"), "en");
    }
}
