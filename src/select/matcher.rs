use std::hash::{Hash, Hasher};

/// Matches a record's tag or value, as written in a query's `sub_matches` or `attr_matches` step.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueMatcher {
    /// A substring match. Unquoted words in a query are case-insensitive; quoted strings are case-sensitive.
    Text { case_sensitive: bool, text: String },
    /// A `/regex/`. Unanchored, so it matches anywhere in the text unless the pattern uses `^` or `$`.
    Regex(Regex),
}

/// A compiled regular expression. Two `Regex`es are equal if their patterns are.
#[derive(Debug, Clone)]
pub struct Regex {
    pub(crate) re: fancy_regex::Regex,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, RegexError> {
        fancy_regex::Regex::new(pattern)
            .map(|re| Self { re })
            .map_err(|err| RegexError(Box::new(err)))
    }

    pub fn as_str(&self) -> &str {
        self.re.as_str()
    }
}

impl PartialEq for Regex {
    fn eq(&self, other: &Self) -> bool {
        self.re.as_str() == other.re.as_str()
    }
}

impl Eq for Regex {}

impl Hash for Regex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(self.re.as_str(), state);
    }
}

/// A regex that couldn't be compiled, or that failed while matching (for example, by exceeding the backtracking
/// limit).
#[derive(Debug, Clone)]
pub struct RegexError(Box<fancy_regex::Error>);

impl std::fmt::Display for RegexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for RegexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// The runtime form of a [`ValueMatcher`]: every variant is compiled down to a single regex.
#[derive(Debug)]
pub(crate) struct StringMatcher {
    re: fancy_regex::Regex,
}

impl StringMatcher {
    pub(crate) fn new(matcher: &ValueMatcher) -> Result<Self, RegexError> {
        let re = match matcher {
            ValueMatcher::Text { case_sensitive, text } => Self::re_from_text(text, *case_sensitive)?,
            ValueMatcher::Regex(re) => re.re.clone(),
        };
        Ok(Self { re })
    }

    pub(crate) fn matches(&self, haystack: &str) -> Result<bool, RegexError> {
        self.re.is_match(haystack).map_err(|err| RegexError(Box::new(err)))
    }

    fn re_from_text(text: &str, case_sensitive: bool) -> Result<fancy_regex::Regex, RegexError> {
        let escaped = fancy_regex::escape(text);
        let pattern = match (case_sensitive, text.is_empty()) {
            (false, false) => format!("(?i){escaped}"),
            _ => escaped.into_owned(),
        };
        fancy_regex::Regex::new(&pattern).map_err(|err| RegexError(Box::new(err)))
    }
}
