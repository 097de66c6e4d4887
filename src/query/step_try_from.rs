use crate::query::args::{ArgKind, QueryArg};
use crate::query::pest::Rule;
use crate::query::{ByteSpan, Pair, Pairs, ParseError, Query};
use crate::select::{Projection, Regex, SelectQuery, SelectStep, ValueMatcher};

impl TryFrom<&'_ str> for SelectQuery {
    type Error = ParseError;

    fn try_from(query_text: &'_ str) -> Result<Self, Self::Error> {
        let parsed: Pairs<'_> = Query::parse(query_text)?;
        Self::try_from(parsed)
    }
}

impl TryFrom<&'_ String> for SelectQuery {
    type Error = ParseError;

    fn try_from(value: &'_ String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<Pairs<'_>> for SelectQuery {
    type Error = ParseError;

    fn try_from(root: Pairs<'_>) -> Result<Self, Self::Error> {
        let mut query = SelectQuery::default();
        // the projection step (if we've seen one), so we can point to it if anything comes after
        let mut projected_by: Option<String> = None;

        for step_pair in root.flatten().filter(|pair| pair.as_rule() == Rule::step) {
            let step = StepArgs::try_from(step_pair)?;
            if let Some(previous) = &projected_by {
                return Err(ParseError::invalid(
                    step.span,
                    format!("{previous} must be the last step, but it's followed by {}", step.name),
                ));
            }
            match step.into_step()? {
                ParsedStep::Select(select_step) => query.steps.push(select_step),
                ParsedStep::Project(name, projection) => {
                    query.projection = projection;
                    projected_by = Some(name);
                }
            }
        }
        Ok(query)
    }
}

enum ParsedStep {
    Select(SelectStep),
    Project(String, Projection),
}

/// A step's name and arguments, before they're checked against what that step accepts.
struct StepArgs {
    name: String,
    name_span: ByteSpan,
    span: ByteSpan,
    args: Vec<QueryArg>,
}

impl TryFrom<Pair<'_>> for StepArgs {
    type Error = ParseError;

    fn try_from(step: Pair<'_>) -> Result<Self, Self::Error> {
        let span = ByteSpan::from(&step);
        let mut name = None;
        let mut args = Vec::new();
        for child in step.into_inner() {
            match child.as_rule() {
                Rule::step_name => name = Some((child.as_str().to_string(), ByteSpan::from(&child))),
                Rule::arg => args.push(QueryArg::try_from(child)?),
                _ => {}
            }
        }
        let Some((name, name_span)) = name else {
            return Err(ParseError::invalid(span, "missing step name"));
        };
        Ok(Self {
            name,
            name_span,
            span,
            args,
        })
    }
}

impl StepArgs {
    fn into_step(self) -> Result<ParsedStep, ParseError> {
        let step = match self.name.as_str() {
            "tag" => SelectStep::Tag(self.exactly_one_plain()?),
            "sub" => SelectStep::Sub(self.exactly_one_plain()?),
            "sub_matches" => SelectStep::SubMatches(self.exactly_one_matcher()?),
            "all" => self.no_args(SelectStep::All)?,
            "attr_equal" => {
                let (name, values) = self.name_and_values()?;
                SelectStep::AttrEqual { name, values }
            }
            "attr_exclude" => {
                let (name, values) = self.name_and_values()?;
                SelectStep::AttrExclude { name, values }
            }
            "attr_matches" => {
                let (name, matcher) = self.name_and_matcher()?;
                SelectStep::AttrMatches { name, matcher }
            }
            "deref" => SelectStep::Deref(self.exactly_one_plain()?),
            "deref_value" => self.no_args(SelectStep::DerefValue)?,
            "first" => self.no_args(SelectStep::First)?,
            "require_sub" => self.no_args(SelectStep::RequireSub)?,
            "require_sub_attr" => {
                let (child, grandchild) = self.exactly_two_plain()?;
                SelectStep::RequireSubAttr { child, grandchild }
            }
            "uniq" => self.no_args(SelectStep::Uniq)?,

            "get_attr" => {
                let names = self.one_or_more_plain()?;
                return Ok(ParsedStep::Project(self.name, Projection::GetAttr(names)));
            }
            "value" => return self.projection(Projection::Value),
            "pointer" => return self.projection(Projection::Pointer),
            "child_values" => return self.projection(Projection::ChildValues),

            unknown => {
                return Err(ParseError::invalid(self.name_span, format!("unknown step \"{unknown}\"")));
            }
        };
        Ok(ParsedStep::Select(step))
    }

    fn projection(self, projection: Projection) -> Result<ParsedStep, ParseError> {
        self.check_arity(0, Some(0))?;
        Ok(ParsedStep::Project(self.name, projection))
    }

    fn no_args(&self, step: SelectStep) -> Result<SelectStep, ParseError> {
        self.check_arity(0, Some(0))?;
        Ok(step)
    }

    fn exactly_one_plain(&self) -> Result<String, ParseError> {
        self.check_arity(1, Some(1))?;
        self.plain(0)
    }

    fn exactly_two_plain(&self) -> Result<(String, String), ParseError> {
        self.check_arity(2, Some(2))?;
        Ok((self.plain(0)?, self.plain(1)?))
    }

    fn one_or_more_plain(&self) -> Result<Vec<String>, ParseError> {
        self.check_arity(1, None)?;
        (0..self.args.len()).map(|idx| self.plain(idx)).collect()
    }

    fn name_and_values(&self) -> Result<(String, Vec<String>), ParseError> {
        self.check_arity(2, None)?;
        let name = self.plain(0)?;
        let values = (1..self.args.len()).map(|idx| self.plain(idx)).collect::<Result<_, _>>()?;
        Ok((name, values))
    }

    fn exactly_one_matcher(&self) -> Result<ValueMatcher, ParseError> {
        self.check_arity(1, Some(1))?;
        self.matcher(0)
    }

    fn name_and_matcher(&self) -> Result<(String, ValueMatcher), ParseError> {
        self.check_arity(2, Some(2))?;
        Ok((self.plain(0)?, self.matcher(1)?))
    }

    fn check_arity(&self, min: usize, max: Option<usize>) -> Result<(), ParseError> {
        let count = self.args.len();
        if count >= min && max.map_or(true, |max| count <= max) {
            return Ok(());
        }
        let expected = match (min, max) {
            (0, Some(0)) => "no arguments".to_string(),
            (min, Some(max)) if min == max => format!("exactly {}", plural(min)),
            (min, _) => format!("at least {}", plural(min)),
        };
        Err(ParseError::invalid(
            self.span,
            format!("{} takes {expected}, but got {count}", self.name),
        ))
    }

    fn plain(&self, idx: usize) -> Result<String, ParseError> {
        let arg = self.arg(idx)?;
        match arg.kind {
            ArgKind::Bare | ArgKind::Quoted => Ok(arg.text.clone()),
            ArgKind::Regex => Err(ParseError::invalid(
                arg.span,
                format!("{} doesn't accept a regex here; use a quoted string instead", self.name),
            )),
        }
    }

    fn matcher(&self, idx: usize) -> Result<ValueMatcher, ParseError> {
        let arg = self.arg(idx)?;
        match arg.kind {
            ArgKind::Bare => Ok(ValueMatcher::Text {
                case_sensitive: false,
                text: arg.text.clone(),
            }),
            ArgKind::Quoted => Ok(ValueMatcher::Text {
                case_sensitive: true,
                text: arg.text.clone(),
            }),
            ArgKind::Regex => Regex::new(&arg.text)
                .map(ValueMatcher::Regex)
                .map_err(|err| ParseError::invalid(arg.span, format!("invalid regex: {err}"))),
        }
    }

    fn arg(&self, idx: usize) -> Result<&QueryArg, ParseError> {
        self.args
            .get(idx)
            .ok_or_else(|| ParseError::invalid(self.span, format!("{} is missing argument {}", self.name, idx + 1)))
    }
}

fn plural(count: usize) -> String {
    match count {
        1 => "1 argument".to_string(),
        n => format!("{n} arguments"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ParseErrorKind;
    use crate::util::utils_for_test::*;

    fn parse(query_text: &str) -> SelectQuery {
        match SelectQuery::try_from(query_text) {
            Ok(query) => query,
            Err(err) => panic!("failed to parse {query_text:?}: {err:?}"),
        }
    }

    fn steps(query_text: &str) -> Vec<SelectStep> {
        let query = parse(query_text);
        assert_eq!(query.projection, Projection::Records);
        query.steps
    }

    /// Returns the error message, and the part of the query that it points to.
    fn error(query_text: &str) -> (String, &str) {
        let err = SelectQuery::try_from(query_text).expect_err("expected a parse error");
        let span = err.span().expect("expected a span");
        unwrap!(err.kind, ParseErrorKind::Invalid { message, .. });
        (message, &query_text[span])
    }

    fn s(text: &str) -> String {
        text.to_string()
    }

    #[test]
    fn empty() {
        assert_eq!(parse(""), SelectQuery::default());
        assert_eq!(parse("  "), SelectQuery::default());
    }

    #[test]
    fn single_steps() {
        assert_eq!(steps("tag INDI"), vec![SelectStep::Tag(s("INDI"))]);
        assert_eq!(steps("sub 'NAME'"), vec![SelectStep::Sub(s("NAME"))]);
        assert_eq!(steps("all"), vec![SelectStep::All]);
        assert_eq!(steps("deref FAMC"), vec![SelectStep::Deref(s("FAMC"))]);
        assert_eq!(steps("deref_value"), vec![SelectStep::DerefValue]);
        assert_eq!(steps("first"), vec![SelectStep::First]);
        assert_eq!(steps("require_sub"), vec![SelectStep::RequireSub]);
        assert_eq!(steps("uniq"), vec![SelectStep::Uniq]);
        assert_eq!(
            steps("require_sub_attr MARR DATE"),
            vec![SelectStep::RequireSubAttr {
                child: s("MARR"),
                grandchild: s("DATE"),
            }]
        );
    }

    #[test]
    fn attr_equal_and_exclude() {
        assert_eq!(
            steps(r#"attr_equal NAME "John /Smith/" Jim"#),
            vec![SelectStep::AttrEqual {
                name: s("NAME"),
                values: vec![s("John /Smith/"), s("Jim")],
            }]
        );
        assert_eq!(
            steps(r#"attr_exclude PLAC """#),
            vec![SelectStep::AttrExclude {
                name: s("PLAC"),
                values: vec![s("")],
            }]
        );
    }

    #[test]
    fn matchers() {
        assert_eq!(
            steps("sub_matches even"),
            vec![SelectStep::SubMatches(ValueMatcher::Text {
                case_sensitive: false,
                text: s("even"),
            })]
        );
        assert_eq!(
            steps("attr_matches NAME 'Smith'"),
            vec![SelectStep::AttrMatches {
                name: s("NAME"),
                matcher: ValueMatcher::Text {
                    case_sensitive: true,
                    text: s("Smith"),
                },
            }]
        );
        assert_eq!(
            steps(r"attr_matches DATE /\d{4}$/"),
            vec![SelectStep::AttrMatches {
                name: s("DATE"),
                matcher: ValueMatcher::Regex(Regex::new(r"\d{4}$").unwrap()),
            }]
        );
    }

    #[test]
    fn chain_with_projection() {
        let query = parse(r#"tag INDI | attr_equal NAME "John /Smith/" | deref FAMC | get_attr WIFE HUSB"#);
        assert_eq!(
            query,
            SelectQuery {
                steps: vec![
                    SelectStep::Tag(s("INDI")),
                    SelectStep::AttrEqual {
                        name: s("NAME"),
                        values: vec![s("John /Smith/")],
                    },
                    SelectStep::Deref(s("FAMC")),
                ],
                projection: Projection::GetAttr(vec![s("WIFE"), s("HUSB")]),
            }
        );
    }

    #[test]
    fn projections() {
        assert_eq!(parse("value").projection, Projection::Value);
        assert_eq!(parse("tag INDI | pointer").projection, Projection::Pointer);
        assert_eq!(parse("tag NOTE|child_values").projection, Projection::ChildValues);
    }

    #[test]
    fn unknown_step() {
        assert_eq!(error("tag INDI | bogus x"), (s(r#"unknown step "bogus""#), "bogus"));
    }

    #[test]
    fn arity_errors() {
        assert_eq!(
            error("tag"),
            (s("tag takes exactly 1 argument, but got 0"), "tag")
        );
        assert_eq!(
            error("first 2 | value"),
            (s("first takes no arguments, but got 1"), "first 2")
        );
        assert_eq!(
            error("attr_equal NAME"),
            (s("attr_equal takes at least 2 arguments, but got 1"), "attr_equal NAME")
        );
        assert_eq!(
            error("require_sub_attr A B C"),
            (s("require_sub_attr takes exactly 2 arguments, but got 3"), "require_sub_attr A B C")
        );
        assert_eq!(
            error("get_attr"),
            (s("get_attr takes at least 1 argument, but got 0"), "get_attr")
        );
        assert_eq!(
            error("value x"),
            (s("value takes no arguments, but got 1"), "value x")
        );
    }

    #[test]
    fn regex_where_plain_is_needed() {
        assert_eq!(
            error("tag /IN.I/"),
            (s("tag doesn't accept a regex here; use a quoted string instead"), "/IN.I/")
        );
    }

    #[test]
    fn invalid_regex() {
        let (message, pointed_to) = error("sub_matches /(unclosed/");
        assert!(message.starts_with("invalid regex: "), "{message}");
        assert_eq!(pointed_to, "/(unclosed/");
    }

    #[test]
    fn step_after_projection() {
        assert_eq!(
            error("value | first"),
            (s("value must be the last step, but it's followed by first"), "first")
        );
    }

    #[test]
    fn grammar_error() {
        let err = SelectQuery::try_from("tag INDI |").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Syntax(_)));
        assert_eq!(err.span(), None);
    }
}
