use crate::record::Record;
use std::collections::HashMap;

/// Lookup table from pointer id to the [`Record`] that declared it.
///
/// The registry doesn't hold the records themselves; it holds each record's position within the tree (the child index
/// at every level, starting from the root). That's what lets a [`GedDoc`](crate::record::GedDoc) own both the tree and
/// the registry, and still hand out plain `&Record`s for both.
///
/// Ids are stored without their `@` markers. Only records whose line declared a pointer are present.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Registry {
    paths: HashMap<String, Vec<usize>>,
}

impl Registry {
    /// Records `id` at the given path. Returns whether an earlier declaration of the same id was replaced.
    pub(crate) fn insert(&mut self, id: &str, path: Vec<usize>) -> bool {
        self.paths.insert(id.to_string(), path).is_some()
    }

    pub(crate) fn resolve<'a>(&self, root: &'a Record, id: &str) -> Option<&'a Record> {
        let path = self.paths.get(id)?;
        let mut current = root;
        for &idx in path {
            current = current.children().get(idx)?;
        }
        Some(current)
    }

    /// Whether a record declared this pointer id. The id should not include `@` markers.
    pub fn contains(&self, id: &str) -> bool {
        self.paths.contains_key(id)
    }

    /// All registered pointer ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Turns a reference, as it appears in a record's value, into a registry id.
///
/// `@F1@` becomes `F1`. Anything that isn't wrapped in markers is returned unchanged.
pub fn xref_id(reference: &str) -> &str {
    reference
        .strip_prefix('@')
        .and_then(|s| s.strip_suffix('@'))
        .filter(|id| !id.is_empty())
        .unwrap_or(reference)
}
