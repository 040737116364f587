//! Citation detection.
//!
//! A [`CitationExtractor`] is an ordered list of [`CitationPattern`]s. Every
//! pattern scans the full text independently, the hits are unioned, and only
//! then are the candidates filtered against the identifiers known to the
//! corpus. Adding a pattern class never touches the extraction logic.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use crate::domain::ArticleId;

/// The article identifier grammar shared by all citation patterns.
pub const ID_PATTERN: &str = r"\d+[A-Z]?(?:\.\d+)?";

static SELF_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:cette|présente)\s+(?:loi|article)").expect("static regex is valid")
});

static NAMED_SELF_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:loi|article)\s+({ID_PATTERN})\s+elle-même"))
        .expect("static regex is valid")
});

/// What must surround a match for it to count as a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    /// Any match counts.
    Any,
    /// The match must have whitespace immediately before and after it.
    Whitespace,
}

/// A named pattern class producing raw citation candidates.
///
/// If the regex has a capture group, the first group is the candidate;
/// otherwise the whole match is.
#[derive(Debug, Clone)]
pub struct CitationPattern {
    name: &'static str,
    regex: Regex,
    delimiter: Delimiter,
}

impl CitationPattern {
    /// Create a pattern from a regular expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the regular expression is invalid.
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
            delimiter: Delimiter::Any,
        })
    }

    /// Create a pattern whose matches only count when surrounded by whitespace
    /// on both sides.
    ///
    /// # Errors
    ///
    /// Returns an error if the regular expression is invalid.
    pub fn whitespace_delimited(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            delimiter: Delimiter::Whitespace,
            ..Self::new(name, pattern)?
        })
    }

    /// The name of the pattern class.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Raw candidate tokens found in `text`, in order of appearance.
    pub fn candidates<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.regex
            .captures_iter(text)
            .filter_map(|captures| captures.get(1).or_else(|| captures.get(0)))
            .filter(move |m| match self.delimiter {
                Delimiter::Any => true,
                Delimiter::Whitespace => {
                    text[..m.start()]
                        .chars()
                        .next_back()
                        .is_some_and(char::is_whitespace)
                        && text[m.end()..]
                            .chars()
                            .next()
                            .is_some_and(char::is_whitespace)
                }
            })
            .map(|m| m.as_str())
    }
}

/// The pattern classes used for French rulebooks, in precedence order.
///
/// 1. `keyword`: "Loi 40", "Article 40", "Voir 40", "Cf. 40"
/// 2. `parenthetical`: "(voir Loi 40)"
/// 3. `dash`: "- Loi 40"
/// 4. `keyword-suffixed`: "Loi 40.2B"
/// 5. `bare-numeric`: " 40 ", only useful because candidates are checked
///    against the known identifiers
///
/// # Panics
///
/// Never; the patterns are static and known to be valid.
#[must_use]
pub fn default_patterns() -> Vec<CitationPattern> {
    let patterns = [
        ("keyword", format!(r"(?i)(?:Loi|Article|Voir|Cf\.?)\s+({ID_PATTERN})")),
        (
            "parenthetical",
            format!(r"(?i)\(\s*(?:voir|cf\.?)\s+(?:Loi|Article)\s+({ID_PATTERN})\s*\)"),
        ),
        ("dash", format!(r"(?i)-\s*(?:Loi|Article)\s+({ID_PATTERN})")),
        (
            "keyword-suffixed",
            format!(r"(?i)(?:Loi|Article)\s+({ID_PATTERN}[A-Z]?)"),
        ),
    ];

    let mut classes: Vec<_> = patterns
        .into_iter()
        .map(|(name, pattern)| CitationPattern::new(name, &pattern).expect("static regex is valid"))
        .collect();
    classes.push(
        CitationPattern::whitespace_delimited("bare-numeric", r"\d+")
            .expect("static regex is valid"),
    );
    classes
}

/// Returns `true` if the content explicitly refers to itself ("cette loi",
/// "présente loi", "Loi 12 elle-même", ...).
#[must_use]
pub fn is_explicit_self_reference(content: &str, own: &ArticleId) -> bool {
    SELF_REFERENCE.is_match(content)
        || NAMED_SELF_REFERENCE
            .captures_iter(content)
            .filter_map(|captures| captures.get(1))
            .any(|m| ArticleId::try_from(m.as_str()).is_ok_and(|id| &id == own))
}

/// Detects the articles cited by a piece of text.
#[derive(Debug, Clone)]
pub struct CitationExtractor {
    patterns: Vec<CitationPattern>,
}

impl Default for CitationExtractor {
    fn default() -> Self {
        Self::new(default_patterns())
    }
}

impl CitationExtractor {
    /// Create an extractor from an ordered list of pattern classes.
    #[must_use]
    pub const fn new(patterns: Vec<CitationPattern>) -> Self {
        Self { patterns }
    }

    /// Append a pattern class with the lowest precedence.
    #[must_use]
    pub fn with_pattern(mut self, pattern: CitationPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// The pattern classes in precedence order.
    #[must_use]
    pub fn patterns(&self) -> &[CitationPattern] {
        &self.patterns
    }

    /// The union of all pattern hits that are well-formed article identifiers.
    ///
    /// No filtering against the corpus happens here, so the set can contain
    /// page numbers, scores, years and the like.
    #[must_use]
    pub fn candidates(&self, text: &str) -> BTreeSet<ArticleId> {
        self.patterns
            .iter()
            .flat_map(|pattern| pattern.candidates(text))
            .filter_map(|token| match ArticleId::try_from(token) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::trace!("Discarding citation candidate '{token}': {e}");
                    None
                }
            })
            .collect()
    }

    /// The candidates of `content`, without the article's own identifier
    /// unless the content explicitly refers to itself.
    ///
    /// Citation patterns frequently re-match an article's own opening line,
    /// which is why the own identifier needs an explicit phrase to survive.
    #[must_use]
    pub fn cite(&self, content: &str, own: &ArticleId) -> BTreeSet<ArticleId> {
        let mut cited = self.candidates(content);
        if cited.contains(own) && !is_explicit_self_reference(content, own) {
            cited.remove(own);
        }
        cited
    }

    /// The set of known articles cited by `content`.
    ///
    /// Candidates for which `is_known` returns `false` are dropped.
    #[must_use]
    pub fn extract(
        &self,
        content: &str,
        own: &ArticleId,
        is_known: impl Fn(&ArticleId) -> bool,
    ) -> BTreeSet<ArticleId> {
        let mut cited = self.cite(content, own);
        cited.retain(|id| is_known(id));
        cited
    }
}
