use crate::record::{GedDoc, Record};
use crate::select::{
    LookupError, Projection, RegexError, SelectQuery, SelectStep, Selector, StringMatcher, ValueMatcher,
};
use std::cell::RefCell;
use std::fmt::{Display, Formatter};

/// The result of running a [`SelectQuery`]: either records, or strings projected out of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    Records(Vec<&'a Record>),
    Values(Vec<&'a str>),
    ChildValues(Vec<(&'a str, &'a str)>),
}

impl Selection<'_> {
    pub fn len(&self) -> usize {
        match self {
            Selection::Records(records) => records.len(),
            Selection::Values(values) => values.len(),
            Selection::ChildValues(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An error while evaluating a query against a document.
#[derive(Debug, Clone)]
pub enum SelectError {
    /// A `deref` or `deref_value` step hit a pointer that isn't in the document.
    Lookup(LookupError),
    /// A matcher's regex failed while matching.
    Regex { step: &'static str, error: RegexError },
}

impl Display for SelectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::Lookup(err) => Display::fmt(err, f),
            SelectError::Regex { step, error } => write!(f, "regex evaluation error in {step} step: {error}"),
        }
    }
}

impl std::error::Error for SelectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelectError::Lookup(err) => Some(err),
            SelectError::Regex { error, .. } => Some(error),
        }
    }
}

impl From<LookupError> for SelectError {
    fn from(value: LookupError) -> Self {
        Self::Lookup(value)
    }
}

impl SelectQuery {
    /// Runs this query against the document, starting from its top-level records.
    ///
    /// An empty result isn't an error; it just means nothing matched.
    pub fn run<'a>(&self, doc: &'a GedDoc) -> Result<Selection<'a>, SelectError> {
        let mut selector = doc.all();
        for step in &self.steps {
            selector = step.apply(selector)?;
        }
        Ok(self.projection.project(selector))
    }
}

impl SelectStep {
    fn apply<'a>(&self, selector: Selector<'a>) -> Result<Selector<'a>, SelectError> {
        let result = match self {
            SelectStep::Tag(name) => selector.tag(name),
            SelectStep::Sub(name) => selector.sub(name),
            SelectStep::SubMatches(matcher) => {
                let matcher = compile(matcher, "sub_matches")?;
                filtering(&matcher, "sub_matches", |pred| selector.sub_cond(pred))?
            }
            SelectStep::All => selector.all(),
            SelectStep::AttrEqual { name, values } => selector.attr_equal(name, &as_strs(values)),
            SelectStep::AttrExclude { name, values } => selector.attr_exclude(name, &as_strs(values)),
            SelectStep::AttrMatches { name, matcher } => {
                let matcher = compile(matcher, "attr_matches")?;
                filtering(&matcher, "attr_matches", |pred| selector.attr_cond(name, pred))?
            }
            SelectStep::Deref(name) => selector.deref(name)?,
            SelectStep::DerefValue => selector.deref_value()?,
            SelectStep::First => selector.first(),
            SelectStep::RequireSub => selector.require_sub(),
            SelectStep::RequireSubAttr { child, grandchild } => selector.require_sub_attr(child, grandchild),
            SelectStep::Uniq => selector.uniq(),
        };
        Ok(result)
    }
}

impl Projection {
    fn project<'a>(&self, selector: Selector<'a>) -> Selection<'a> {
        match self {
            Projection::Records => Selection::Records(selector.into_records()),
            Projection::GetAttr(names) => Selection::Values(selector.get_attr(&as_strs(names))),
            Projection::Value => Selection::Values(selector.value()),
            Projection::Pointer => Selection::Values(selector.pointer()),
            Projection::ChildValues => Selection::ChildValues(selector.collect_child_values()),
        }
    }
}

fn as_strs(strings: &[String]) -> Vec<&str> {
    strings.iter().map(String::as_str).collect()
}

fn compile(matcher: &ValueMatcher, step: &'static str) -> Result<StringMatcher, SelectError> {
    StringMatcher::new(matcher).map_err(|error| SelectError::Regex { step, error })
}

/// Runs a predicate-taking selector operation with a fallible matcher.
///
/// The selector operations take infallible predicates, so a matching error is stashed and the predicate reports
/// `false`; the first such error, if any, is then returned in place of the result.
fn filtering<'a, F>(matcher: &StringMatcher, step: &'static str, select: F) -> Result<Selector<'a>, SelectError>
where
    F: FnOnce(&dyn Fn(&str) -> bool) -> Selector<'a>,
{
    let failure: RefCell<Option<RegexError>> = RefCell::new(None);
    let predicate = |haystack: &str| match matcher.matches(haystack) {
        Ok(matched) => matched,
        Err(err) => {
            failure.borrow_mut().get_or_insert(err);
            false
        }
    };
    let result = select(&predicate);
    match failure.into_inner() {
        None => Ok(result),
        Some(error) => Err(SelectError::Regex { step, error }),
    }
}
