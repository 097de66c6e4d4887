use crate::query::Pair;
use std::fmt::{Display, Formatter};
use std::ops::Range;

/// An error parsing a textual query into a [`SelectQuery`](crate::select::SelectQuery).
///
/// This is either a syntax error (the text doesn't fit the query grammar), or a well-formed step that doesn't make
/// sense: an unknown name, the wrong number of arguments, a projection that isn't last, and so on.
///
/// The `Display` form only includes the message. To render it against the query text (with a caret under the offending
/// part), the run layer pairs it with the original string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub(crate) kind: ParseErrorKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ParseErrorKind {
    Syntax(crate::query::Error),
    Invalid { span: ByteSpan, message: String },
}

impl ParseError {
    pub(crate) fn invalid(span: ByteSpan, message: impl Into<String>) -> Self {
        Self {
            kind: ParseErrorKind::Invalid {
                span,
                message: message.into(),
            },
        }
    }

    /// The byte range within the query text that this error is about, if it's about something more specific than the
    /// grammar as a whole.
    pub fn span(&self) -> Option<Range<usize>> {
        match &self.kind {
            ParseErrorKind::Syntax(_) => None,
            ParseErrorKind::Invalid { span, .. } => Some(span.start..span.end),
        }
    }
}

impl std::error::Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ParseErrorKind::Syntax(error) => Display::fmt(error, f),
            ParseErrorKind::Invalid { message, .. } => f.write_str(message),
        }
    }
}

impl From<crate::query::Error> for ParseError {
    fn from(err: crate::query::Error) -> Self {
        Self {
            kind: ParseErrorKind::Syntax(err),
        }
    }
}

/// Start and end byte offsets into the query text; a [`pest::Span`] without the borrow.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ByteSpan {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl From<&Pair<'_>> for ByteSpan {
    fn from(pair: &Pair<'_>) -> Self {
        let span = pair.as_span();
        Self {
            start: span.start(),
            end: span.end(),
        }
    }
}
