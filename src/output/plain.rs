use crate::record::Record;
use crate::select::Selection;
use std::io::{self, Write};

/// Options for [`PlainWriter`].
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct PlainWriterOptions {
    /// Only write the selected records' own lines, not their children.
    pub shallow: bool,
}

/// Writes a [`Selection`] as plain text.
///
/// Records are written as an outline, one record per line, with each level of nesting indented two spaces:
///
/// ```text
/// @I1@ INDI
///   NAME John /Smith/
///   BIRT
///     DATE 1 JAN 1900
/// ```
///
/// Values are written one per line, and child values as `TAG value`.
#[derive(Copy, Clone, Default, Debug)]
pub struct PlainWriter {
    options: PlainWriterOptions,
}

impl PlainWriter {
    pub fn with_options(options: PlainWriterOptions) -> Self {
        Self { options }
    }

    pub fn write<W: Write>(&self, selection: &Selection, out: &mut W) -> io::Result<()> {
        match selection {
            Selection::Records(records) => {
                for record in records {
                    self.write_record(record, out)?;
                }
            }
            Selection::Values(values) => {
                for value in values {
                    writeln!(out, "{value}")?;
                }
            }
            Selection::ChildValues(pairs) => {
                for (tag, value) in pairs {
                    write_tag_and_value(out, tag, value)?;
                }
            }
        }
        out.flush()
    }

    fn write_record<W: Write>(&self, record: &Record, out: &mut W) -> io::Result<()> {
        let mut indent = String::new();
        let mut pending = vec![(record, 0)];
        while let Some((record, depth)) = pending.pop() {
            let width = depth * 2;
            if indent.len() < width {
                indent.extend(std::iter::repeat(' ').take(width - indent.len()));
            }
            out.write_all(indent[..width].as_bytes())?;
            if let Some(pointer) = record.pointer() {
                write!(out, "@{pointer}@ ")?;
            }
            write_tag_and_value(out, record.tag(), record.value())?;
            if !self.options.shallow {
                pending.extend(record.children().iter().rev().map(|child| (child, depth + 1)));
            }
        }
        Ok(())
    }
}

fn write_tag_and_value<W: Write>(out: &mut W, tag: &str, value: &str) -> io::Result<()> {
    if value.is_empty() {
        writeln!(out, "{tag}")
    } else {
        writeln!(out, "{tag} {value}")
    }
}
