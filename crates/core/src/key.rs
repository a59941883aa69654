use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Join key shared by the alias file and the concepts file.
///
/// NUL characters are removed first, then surrounding whitespace and line
/// terminators are trimmed, then the result is upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn new(raw: &str) -> Self {
        let without_nul: String = raw.chars().filter(|&c| c != '\0').collect();
        Self(trim_blank(&without_nul).to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for NormalizedKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unicode whitespace plus the U+001C..U+001F separators
pub(crate) fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

pub(crate) fn trim_blank(text: &str) -> &str {
    text.trim_matches(is_blank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_padding_nul_and_case() {
        assert_eq!(NormalizedKey::new("  ab12 \r\n").as_str(), "AB12");
        assert_eq!(NormalizedKey::new("\0 a\0b \0").as_str(), "AB");
        assert_eq!(NormalizedKey::new("\u{85}x\u{a0}\u{1f}").as_str(), "X");
        assert!(NormalizedKey::new(" \0\t ").is_empty());
    }

    #[test]
    fn keeps_inner_spaces_and_leading_zeros() {
        assert_eq!(NormalizedKey::new(" 0 100 ").as_str(), "0 100");
        assert_eq!(NormalizedKey::new("0000000100").as_str(), "0000000100");
    }

    proptest! {
        #[test]
        fn proptest_normalization_is_idempotent(raw in "[ \\t\\x00a-zA-Z0-9ñÑ]{0,16}") {
            let once = NormalizedKey::new(&raw);
            let twice = NormalizedKey::new(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn proptest_padding_and_case_do_not_matter(
            code in "[a-z0-9]{1,8}",
            left in "[ \\t\\x00]{0,3}",
            right in "[ \\x00\\r\\n]{0,3}",
        ) {
            let padded = format!("{left}{code}{right}");
            prop_assert_eq!(
                NormalizedKey::new(&padded),
                NormalizedKey::new(&code.to_uppercase())
            );
        }
    }
}
