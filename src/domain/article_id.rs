use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

/// A normalized article identifier.
///
/// Format:
/// `{NUMBER}{SUFFIX?}{.SECTION?}`, where:
/// - `NUMBER` is a run of ASCII digits (e.g. `40`)
/// - `SUFFIX` is an optional single uppercase letter (e.g. `40A`)
/// - `SECTION` is an optional decimal sub-section (e.g. `40.2`, `40A.2`)
///
/// Parsing trims surrounding whitespace and uppercases the letter suffix, so
/// `" 40a "` and `"40A"` are the same identifier. Leading zeros are kept:
/// `"07"` and `"7"` are distinct identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleId(String);

impl ArticleId {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the leading numeric part of the identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use rulebook::ArticleId;
    ///
    /// let id: ArticleId = "40A.2".parse().unwrap();
    /// assert_eq!(id.number(), "40");
    /// ```
    #[must_use]
    pub fn number(&self) -> &str {
        let end = self
            .0
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.0.len());
        &self.0[..end]
    }

    /// Returns the letter suffix, if any.
    #[must_use]
    pub fn suffix(&self) -> Option<char> {
        self.0[self.number().len()..]
            .chars()
            .next()
            .filter(char::is_ascii_uppercase)
    }

    /// Returns the decimal sub-section, if any.
    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, section)| section)
    }
}

/// Errors that can occur when parsing an article identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The input was empty after trimming.
    #[error("Invalid article ID: empty string")]
    Empty,

    /// The input did not start with a digit.
    #[error("Invalid article ID '{0}': must start with a digit")]
    MissingNumber(String),

    /// The sub-section after the '.' was empty or non-numeric.
    #[error("Invalid article ID '{0}': sub-section must be a non-empty number")]
    Section(String),

    /// Unexpected characters after the identifier.
    #[error("Invalid article ID '{0}': unexpected trailing characters '{1}'")]
    Trailing(String, String),
}

impl FromStr for ArticleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(Error::Empty);
        }

        let digits = normalized.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(Error::MissingNumber(normalized));
        }

        let mut rest = &normalized[digits..];

        if let Some(c) = rest.chars().next() {
            if c.is_ascii_uppercase() {
                rest = &rest[1..];
            }
        }

        if let Some(section) = rest.strip_prefix('.') {
            let section_digits = section.bytes().take_while(u8::is_ascii_digit).count();
            if section_digits == 0 {
                return Err(Error::Section(normalized));
            }
            rest = &section[section_digits..];
        }

        if !rest.is_empty() {
            let trailing = rest.to_string();
            return Err(Error::Trailing(normalized, trailing));
        }

        Ok(Self(normalized))
    }
}

impl TryFrom<&str> for ArticleId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl TryFrom<String> for ArticleId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<ArticleId> for String {
    fn from(id: ArticleId) -> Self {
        id.0
    }
}

impl AsRef<str> for ArticleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ArticleId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("40", "40"; "plain number")]
    #[test_case("40A", "40A"; "letter suffix")]
    #[test_case("40a", "40A"; "lowercase suffix is uppercased")]
    #[test_case("40.2", "40.2"; "sub-section")]
    #[test_case("40b.12", "40B.12"; "suffix and sub-section")]
    #[test_case("  12 ", "12"; "surrounding whitespace is trimmed")]
    #[test_case("007", "007"; "leading zeros are kept")]
    fn parse_valid(input: &str, expected: &str) {
        let id = ArticleId::try_from(input).unwrap();
        assert_eq!(id.as_str(), expected);
    }

    #[test]
    fn parse_empty_fails() {
        assert_eq!(ArticleId::try_from("   "), Err(Error::Empty));
    }

    #[test]
    fn parse_without_number_fails() {
        assert!(matches!(
            ArticleId::try_from("A12"),
            Err(Error::MissingNumber(_))
        ));
    }

    #[test]
    fn parse_empty_section_fails() {
        assert!(matches!(ArticleId::try_from("12."), Err(Error::Section(_))));
        assert!(matches!(ArticleId::try_from("12.x"), Err(Error::Section(_))));
    }

    #[test]
    fn parse_trailing_characters_fails() {
        assert!(matches!(
            ArticleId::try_from("12AB"),
            Err(Error::Trailing(_, _))
        ));
        assert!(matches!(
            ArticleId::try_from("40.2B"),
            Err(Error::Trailing(_, _))
        ));
    }

    #[test]
    fn distinct_forms_normalize_identically() {
        let a = ArticleId::try_from("40a").unwrap();
        let b = ArticleId::try_from(" 40A").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn components() {
        let id = ArticleId::try_from("40B.3").unwrap();
        assert_eq!(id.number(), "40");
        assert_eq!(id.suffix(), Some('B'));
        assert_eq!(id.section(), Some("3"));

        let plain = ArticleId::try_from("7").unwrap();
        assert_eq!(plain.suffix(), None);
        assert_eq!(plain.section(), None);
    }

    #[test]
    fn serde_roundtrips_as_string() {
        let id = ArticleId::try_from("12a").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"12A\"");

        let invalid: Result<ArticleId, _> = serde_json::from_str("\"abc\"");
        assert!(invalid.is_err());
    }

    #[test]
    fn error_display() {
        let error = Error::Trailing("12AB".to_string(), "B".to_string());
        assert_eq!(
            format!("{error}"),
            "Invalid article ID '12AB': unexpected trailing characters 'B'"
        );
    }
}
