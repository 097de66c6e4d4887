use pest::error::LineColLocation;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "record/line.pest"] // relative to src
struct LinePairs;

/// A single line, split into its grammar components. Nothing has been validated beyond the grammar itself; in
/// particular, the level hasn't been checked against its neighbors.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct RawLine<'a> {
    pub level: usize,
    /// The pointer id, without its `@` markers.
    pub pointer: Option<&'a str>,
    pub tag: &'a str,
    /// The rest of the line after the tag, with leading spaces removed. May be empty.
    pub value: &'a str,
}

/// The line didn't match the grammar. `column` is 1-based, and points at the first character that couldn't be matched.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LineMismatch {
    pub column: usize,
}

pub(crate) fn parse_line(line: &str) -> Result<RawLine<'_>, LineMismatch> {
    let mut pairs = LinePairs::parse(Rule::line, line).map_err(|err| {
        let column = match err.line_col {
            LineColLocation::Pos((_, col)) => col,
            LineColLocation::Span((_, col), _) => col,
        };
        LineMismatch { column }
    })?;
    let Some(line_pair) = pairs.next() else {
        return Err(LineMismatch { column: 1 });
    };

    let mut raw = RawLine {
        level: 0,
        pointer: None,
        tag: "",
        value: "",
    };
    for pair in line_pair.into_inner() {
        match pair.as_rule() {
            Rule::level => {
                // the grammar guarantees digits, so the only failure is overflow
                raw.level = pair.as_str().parse().map_err(|_| LineMismatch { column: 1 })?;
            }
            Rule::pointer => {
                raw.pointer = pair.into_inner().next().map(|xref| xref.as_str());
            }
            Rule::tag => raw.tag = pair.as_str(),
            Rule::value => raw.value = pair.as_str().trim_start_matches(' '),
            _ => {}
        }
    }
    Ok(raw)
}
