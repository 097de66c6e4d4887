use crate::record::line::parse_line;
use crate::record::lines::{split_lines, strip_bom};
use crate::record::registry::{xref_id, Registry};
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::path::Path;
use std::{fs, io};

/// A single parsed record: one line of the input, plus everything nested under it.
///
/// ```text
/// 0 @I1@ INDI
/// 1 NAME John /Smith/
/// 1 BIRT
/// 2 DATE 1 JAN 1900
/// ```
///
/// That input is one `INDI` record with pointer `I1` and an empty value. It has two children: `NAME` (whose value is
/// `John /Smith/`) and `BIRT`, which has its own `DATE` child.
///
/// The nesting level isn't stored; it's implied by where the record sits in the tree.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Record {
    tag: String,
    value: String,
    pointer: Option<String>,
    children: Vec<Record>,
}

impl Record {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The raw text after the tag, or `""` if there was none.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The pointer id this record declared, without its `@` markers.
    pub fn pointer(&self) -> Option<&str> {
        self.pointer.as_deref()
    }

    /// Direct children, in file order.
    pub fn children(&self) -> &[Record] {
        &self.children
    }
}

// Iterative: nesting depth is bounded only by the input.
impl Drop for Record {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut record) = pending.pop() {
            pending.append(&mut record.children);
        }
    }
}

/// A fully parsed record file.
///
/// This comprises the tree of records (under a synthetic root that's never exposed directly) and the
/// [`Registry`] of pointer ids. Both are fixed at parse time; nothing mutates them afterwards. To query the document,
/// start with [`GedDoc::all`].
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct GedDoc {
    root: Record,
    registry: Registry,
}

impl GedDoc {
    /// Parse a whole file's worth of text, using default [`ParseOptions`].
    pub fn parse(text: &str) -> Result<Self, InvalidGed> {
        Self::parse_with(text, &ParseOptions::default())
    }

    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Self, InvalidGed> {
        Self::from_lines(split_lines(strip_bom(text)), options)
    }

    /// Parse from individual lines. The lines should not include their terminators.
    pub fn from_lines<I, S>(lines: I, options: &ParseOptions) -> Result<Self, InvalidGed>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = TreeBuilder::new(options);
        for (idx, line) in lines.into_iter().enumerate() {
            builder.accept(idx + 1, line.as_ref())?;
        }
        Ok(builder.finish())
    }

    /// Read everything from `reader`, then parse it.
    pub fn read<R: Read>(mut reader: R, options: &ParseOptions) -> Result<Self, ReadError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        Ok(Self::parse_with(&contents, options)?)
    }

    pub fn open<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self, ReadError> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse_with(&contents, options)?)
    }

    /// The level-0 records, in file order.
    pub fn roots(&self) -> &[Record] {
        self.root.children()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Looks up the record a reference points to.
    ///
    /// The reference may be given as it appears in a value (`@I1@`) or as a bare id (`I1`).
    pub fn lookup(&self, reference: &str) -> Option<&Record> {
        self.registry.resolve(&self.root, xref_id(reference))
    }
}

/// Options for parsing.
///
/// See: [`GedDoc::parse_with`].
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// If two records declare the same pointer id, fail with [`InvalidGed::DuplicatePointer`]. Defaults to `false`, in
    /// which case the later declaration replaces the earlier one in the [`Registry`] (both records stay in the tree).
    pub reject_duplicate_pointers: bool,
}

/// Error conditions from parsing. All of them are fatal: parsing stops at the first one.
///
/// Line numbers are 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidGed {
    /// The line doesn't match `<level> [@<pointer>@ ]<tag>[ <value>]`.
    Format { line: usize, column: usize },

    /// The line's level is more than one deeper than the line before it. `max_level` is the deepest level that would
    /// have been allowed.
    Level {
        line: usize,
        level: usize,
        max_level: usize,
    },

    /// A pointer id was declared a second time. Only reported if [`ParseOptions::reject_duplicate_pointers`] is set.
    DuplicatePointer { line: usize, pointer: String },
}

impl InvalidGed {
    pub fn line(&self) -> usize {
        match self {
            InvalidGed::Format { line, .. } | InvalidGed::Level { line, .. } | InvalidGed::DuplicatePointer { line, .. } => {
                *line
            }
        }
    }
}

impl std::error::Error for InvalidGed {}

impl Display for InvalidGed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidGed::Format { line, column } => {
                write!(
                    f,
                    "malformed record at line {line}, column {column}: expected \"<level> [@<pointer>@ ]<tag>[ <value>]\""
                )
            }
            InvalidGed::Level { line, level, max_level } => {
                write!(
                    f,
                    "bad nesting at line {line}: level {level} is deeper than the maximum allowed level of {max_level}"
                )
            }
            InvalidGed::DuplicatePointer { line, pointer } => {
                write!(f, "duplicate pointer @{pointer}@ at line {line}")
            }
        }
    }
}

/// Error from [`GedDoc::read`] or [`GedDoc::open`].
#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    Invalid(InvalidGed),
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(err) => Some(err),
            ReadError::Invalid(err) => Some(err),
        }
    }
}

impl Display for ReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Io(err) => Display::fmt(err, f),
            ReadError::Invalid(err) => Display::fmt(err, f),
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<InvalidGed> for ReadError {
    fn from(value: InvalidGed) -> Self {
        Self::Invalid(value)
    }
}

struct TreeBuilder<'o> {
    options: &'o ParseOptions,
    /// Records that can still receive children. `open[0]` is the root; `open[n]` is the currently open record at level
    /// `n - 1`. A record only gets attached to its parent once it's closed.
    open: Vec<Record>,
    /// For each open record other than the root, its index within its parent's children.
    path: Vec<usize>,
    registry: Registry,
}

impl<'o> TreeBuilder<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            open: vec![Record::default()],
            path: Vec::with_capacity(8), // arbitrary guess
            registry: Registry::default(),
        }
    }

    fn accept(&mut self, line_number: usize, line: &str) -> Result<(), InvalidGed> {
        let raw = parse_line(line).map_err(|mismatch| InvalidGed::Format {
            line: line_number,
            column: mismatch.column,
        })?;

        let max_level = self.open.len() - 1;
        if raw.level > max_level {
            return Err(InvalidGed::Level {
                line: line_number,
                level: raw.level,
                max_level,
            });
        }

        // after this, the last open record is the new record's parent (at level - 1)
        self.close_to(raw.level + 1);

        // All earlier siblings have been closed, so they're already attached.
        let index = self.open[raw.level].children.len();
        self.path.truncate(raw.level);
        self.path.push(index);

        if let Some(id) = raw.pointer {
            let replaced = self.registry.insert(id, self.path.clone());
            if replaced && self.options.reject_duplicate_pointers {
                return Err(InvalidGed::DuplicatePointer {
                    line: line_number,
                    pointer: id.to_string(),
                });
            }
        }

        self.open.push(Record {
            tag: raw.tag.to_string(),
            value: raw.value.to_string(),
            pointer: raw.pointer.map(str::to_string),
            children: Vec::new(),
        });
        Ok(())
    }

    /// Closes open records until only `depth` remain (never fewer than one: the root stays open).
    fn close_to(&mut self, depth: usize) {
        while self.open.len() > depth.max(1) {
            let Some(done) = self.open.pop() else {
                break;
            };
            let Some(parent) = self.open.last_mut() else {
                break;
            };
            parent.children.push(done);
        }
    }

    fn finish(mut self) -> GedDoc {
        self.close_to(1);
        GedDoc {
            root: self.open.pop().unwrap_or_default(),
            registry: self.registry,
        }
    }
}
