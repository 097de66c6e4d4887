use crate::query::pest::Rule;
use crate::query::{ByteSpan, Pair, ParseError};

/// One argument to a step, unescaped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct QueryArg {
    pub(crate) text: String,
    pub(crate) kind: ArgKind,
    pub(crate) span: ByteSpan,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ArgKind {
    Bare,
    Quoted,
    Regex,
}

impl TryFrom<Pair<'_>> for QueryArg {
    type Error = ParseError;

    /// Builds an argument from an `arg` pair (or directly from one of its three alternatives).
    fn try_from(pair: Pair<'_>) -> Result<Self, Self::Error> {
        let span = ByteSpan::from(&pair);
        match pair.as_rule() {
            Rule::arg => {
                let mut inner = pair.into_inner();
                match (inner.next(), inner.next()) {
                    (Some(only), None) => Self::try_from(only),
                    _ => Err(ParseError::invalid(span, "expected exactly one argument")),
                }
            }
            Rule::bare_word => Ok(Self {
                text: pair.as_str().to_string(),
                kind: ArgKind::Bare,
                span,
            }),
            Rule::quoted_string => {
                let mut text = String::with_capacity(pair.as_str().len());
                unescape_into(&mut text, pair)?;
                Ok(Self {
                    text,
                    kind: ArgKind::Quoted,
                    span,
                })
            }
            Rule::regex => {
                let mut text = String::with_capacity(pair.as_str().len());
                unescape_into(&mut text, pair)?;
                Ok(Self {
                    text,
                    kind: ArgKind::Regex,
                    span,
                })
            }
            other => Err(ParseError::invalid(span, format!("unexpected {other:?} where an argument was expected"))),
        }
    }
}

fn unescape_into(out: &mut String, pair: Pair<'_>) -> Result<(), ParseError> {
    for child in pair.into_inner() {
        let span = ByteSpan::from(&child);
        match child.as_rule() {
            Rule::double_plain | Rule::single_plain | Rule::regex_plain => out.push_str(child.as_str()),
            Rule::regex_escaped_slash => out.push('/'),
            Rule::escaped_char => {
                // the grammar guarantees a backslash followed by exactly one char
                let escaped = match child.as_str().chars().nth(1) {
                    Some(result @ ('"' | '\'' | '\\')) => result,
                    Some('n') => '\n',
                    Some('r') => '\r',
                    Some('t') => '\t',
                    other => {
                        return Err(ParseError::invalid(span, format!("invalid escape char: {other:?}")));
                    }
                };
                out.push(escaped);
            }
            _ => unescape_into(out, child)?,
        }
    }
    Ok(())
}
