use pest::Parser;
use pest_derive::Parser;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[derive(Parser)]
#[grammar = "query/grammar.pest"]
struct QueryPairs;

pub(crate) struct Query {
    _private: (),
}

pub(crate) type Pair<'a> = pest::iterators::Pair<'a, Rule>;
pub(crate) type Pairs<'a> = pest::iterators::Pairs<'a, Rule>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Error {
    pub(crate) pest_error: Rc<pest::error::Error<Rule>>,
}

impl Error {
    pub(crate) fn new_from_span(span: pest::Span, message: String) -> Self {
        Self {
            pest_error: Rc::new(pest::error::Error::new_from_span(
                pest::error::ErrorVariant::CustomError { message },
                span,
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.pest_error, f)
    }
}

impl std::error::Error for Error {}

impl Query {
    pub(crate) fn parse(query_text: &str) -> Result<Pairs<'_>, Error> {
        QueryPairs::parse(Rule::top, query_text).map_err(Self::format_err)
    }

    fn format_err(err: pest::error::Error<Rule>) -> Error {
        let renamed = err.renamed_rules(|err| {
            match err {
                Rule::EOI => "end of input",
                Rule::WHITESPACE => "whitespace",
                Rule::top => "valid query",
                Rule::chain => "one or more steps",
                Rule::step => "step",
                Rule::step_delim => "_|_",
                Rule::step_name => "step name",
                Rule::arg => "argument",
                Rule::bare_word => "word",
                Rule::quoted_string | Rule::double_quoted | Rule::single_quoted => "quoted string",
                Rule::double_plain | Rule::single_plain => "character in quoted string",
                Rule::escaped_char => "\\\", \\', \\\\, \\n, \\r, or \\t",
                Rule::regex => "regex",
                Rule::regex_plain => "regex character",
                Rule::regex_escaped_slash => "_\\/_",
            }
            .to_string()
            .replace('_', "\"")
        });
        Error {
            pest_error: Rc::new(renamed),
        }
    }
}
