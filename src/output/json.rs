use crate::record::Record;
use crate::select::Selection;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// How many levels of records JSON output can hold, counting each selected record as the first level.
pub const MAX_JSON_DEPTH: usize = 256;

/// A selected record has descendants nested more than [`MAX_JSON_DEPTH`] levels deep.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NestingTooDeep;

impl Display for NestingTooDeep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "can't write records nested more than {MAX_JSON_DEPTH} levels deep as JSON")
    }
}

impl std::error::Error for NestingTooDeep {}

/// A wrapper around a [`Selection`] that implements [`Serialize`].
///
/// Records serialize as objects with `tag`, and (only when present) `pointer`, `value` and `children`:
///
/// ```json
/// [{"tag": "INDI", "pointer": "I1", "children": [{"tag": "NAME", "value": "John /Smith/"}]}]
/// ```
///
/// Values serialize as an array of strings, and child values as an array of `[tag, value]` pairs.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum SerializableSelection<'a> {
    Records(Vec<SerdeRecord<'a>>),
    Values(&'a [&'a str]),
    ChildValues(&'a [(&'a str, &'a str)]),
}

#[derive(Clone, Debug, Serialize)]
pub struct SerdeRecord<'a> {
    tag: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pointer: Option<&'a str>,

    #[serde(skip_serializing_if = "is_empty_str")]
    value: &'a str,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<SerdeRecord<'a>>,
}

impl<'a> SerializableSelection<'a> {
    /// If `shallow`, records are serialized without their children. Otherwise, each selected record's descendants must
    /// fit within [`MAX_JSON_DEPTH`].
    pub fn new(selection: &'a Selection<'a>, shallow: bool) -> Result<Self, NestingTooDeep> {
        let serializable = match selection {
            Selection::Records(records) => Self::Records(
                records
                    .iter()
                    .map(|r| SerdeRecord::new(r, 0, !shallow))
                    .collect::<Result<_, _>>()?,
            ),
            Selection::Values(values) => Self::Values(values),
            Selection::ChildValues(pairs) => Self::ChildValues(pairs),
        };
        Ok(serializable)
    }
}

impl<'a> SerdeRecord<'a> {
    fn new(record: &'a Record, depth: usize, with_children: bool) -> Result<Self, NestingTooDeep> {
        if depth >= MAX_JSON_DEPTH {
            return Err(NestingTooDeep);
        }
        let children = if with_children {
            record
                .children()
                .iter()
                .map(|c| Self::new(c, depth + 1, true))
                .collect::<Result<_, _>>()?
        } else {
            Vec::new()
        };
        Ok(Self {
            tag: record.tag(),
            pointer: record.pointer(),
            value: record.value(),
            children,
        })
    }
}

fn is_empty_str(value: &&str) -> bool {
    value.is_empty()
}
