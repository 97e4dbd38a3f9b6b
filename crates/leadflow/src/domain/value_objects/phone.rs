//! Phone Normalization
//!
//! Telephony numbers arrive in inconsistent international formats
//! ("+34 600 111 222", "0034600111222", "600-111-222"). Exact matching
//! is too brittle, so lookups key on the trailing nine digits: high
//! recall at the cost of a small false-positive risk.

use serde::{Deserialize, Serialize};

/// Number of trailing digits used as the fuzzy match key. Nine digits
/// covers a full national number in every supported market.
pub const SUFFIX_KEY_LEN: usize = 9;

/// A phone number reduced to its two matchable forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPhone {
    /// Digits and leading `+` only, everything else stripped.
    pub canonical: String,
    /// Trailing nine digits of the number, fewer if the number is short.
    pub suffix_key: String,
}

impl NormalizedPhone {
    pub fn is_empty(&self) -> bool {
        self.suffix_key.is_empty()
    }
}

/// Strip a raw phone string down to canonical form and suffix key.
pub fn normalize(raw: &str) -> NormalizedPhone {
    let canonical: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    let digits: Vec<char> = canonical.chars().filter(char::is_ascii_digit).collect();
    let start = digits.len().saturating_sub(SUFFIX_KEY_LEN);
    let suffix_key: String = digits[start..].iter().collect();
    NormalizedPhone {
        canonical,
        suffix_key,
    }
}

/// True when a stored number (raw or canonical form) contains the key's
/// trailing digits.
pub fn matches(stored: &str, key: &NormalizedPhone) -> bool {
    if key.is_empty() {
        return false;
    }
    let stored_canonical = normalize(stored).canonical;
    stored.contains(&key.suffix_key) || stored_canonical.contains(&key.suffix_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_formatting() {
        let n = normalize("+34 600 111 222");
        assert_eq!(n.canonical, "+34600111222");
        assert_eq!(n.suffix_key, "600111222");
    }

    #[test]
    fn test_normalize_short_number_keeps_all_digits() {
        let n = normalize("4567");
        assert_eq!(n.suffix_key, "4567");
    }

    #[test]
    fn test_normalize_empty() {
        let n = normalize("");
        assert!(n.is_empty());
    }

    #[test]
    fn test_matches_across_formats() {
        let key = normalize("+34 600 111 222");
        assert!(matches("600111222", &key));
        assert!(matches("0034600111222", &key));
        assert!(matches("+34-600-111-222", &key));
        assert!(!matches("600999888", &key));
    }

    #[test]
    fn test_empty_key_never_matches() {
        let key = normalize("");
        assert!(!matches("600111222", &key));
    }
}
