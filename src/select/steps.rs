use crate::select::ValueMatcher;

/// One `|`-separated step of a textual query, in memory.
///
/// Each step maps onto a [`Selector`](crate::select::Selector) operation of the same name (or, for the `_matches`
/// steps, its predicate-taking counterpart).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SelectStep {
    /// `tag INDI`
    Tag(String),
    /// `sub NAME`
    Sub(String),
    /// `sub_matches /^(BIRT|DEAT)$/`
    SubMatches(ValueMatcher),
    /// `all`
    All,
    /// `attr_equal SEX M F`
    AttrEqual { name: String, values: Vec<String> },
    /// `attr_exclude PLAC ""`
    AttrExclude { name: String, values: Vec<String> },
    /// `attr_matches NAME smith`
    AttrMatches { name: String, matcher: ValueMatcher },
    /// `deref FAMC`
    Deref(String),
    /// `deref_value`
    DerefValue,
    /// `first`
    First,
    /// `require_sub`
    RequireSub,
    /// `require_sub_attr MARR DATE`
    RequireSubAttr { child: String, grandchild: String },
    /// `uniq`
    Uniq,
}

/// What a query produces from its final selection. Only the last step of a query may be a projection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Projection {
    /// The selected records themselves. This is what you get if the query doesn't end in a projection step.
    #[default]
    Records,
    /// `get_attr DATE PLAC`
    GetAttr(Vec<String>),
    /// `value`
    Value,
    /// `pointer`
    Pointer,
    /// `child_values`
    ChildValues,
}

/// The in-memory equivalent of a textual query: a chain of steps, and what to project at the end.
///
/// ```
/// use gedq::select::{Projection, SelectQuery, SelectStep};
///
/// let query = SelectQuery::try_from("tag INDI | get_attr SEX").unwrap();
/// assert_eq!(query.steps, vec![SelectStep::Tag("INDI".to_string())]);
/// assert_eq!(query.projection, Projection::GetAttr(vec!["SEX".to_string()]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectQuery {
    pub steps: Vec<SelectStep>,
    pub projection: Projection,
}
