use crate::output::{PlainWriter, SerializableSelection};
use crate::query::{ParseError, ParseErrorKind};
use crate::record::{GedDoc, InvalidGed, ParseOptions};
use crate::run::cli::OutputFormat;
use crate::run::RunOptions;
use crate::select::{SelectError, SelectQuery};
use crate::query;
use pest::Span;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::{env, io};

/// Anything that can stop a [`run`]. Each is reported once, through [`OsFacade::write_error`].
#[derive(Debug)]
pub enum Error {
    /// The selector chain isn't valid.
    ///
    /// This comes from [`SelectQuery`'s `TryFrom::<&str>`][SelectQuery#impl-TryFrom<%26str>-for-SelectQuery].
    QueryParse(QueryParseError),

    /// The record file failed to parse.
    ///
    /// This comes from [`GedDoc::parse_with`].
    GedParse(Input, InvalidGed),

    /// The query failed while running against the document; for example, a `deref` hit an undeclared pointer.
    Select(SelectError),

    /// Couldn't read the record file (or stdin).
    FileReadError(Input, io::Error),

    /// Couldn't write the results.
    Output(io::Error),
}

impl std::error::Error for Error {}

/// A [`ParseError`], together with the selector text it came from, so that it can be displayed in context.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryParseError {
    query_string: String,
    error: ParseError,
}

impl std::error::Error for QueryParseError {}

impl Display for QueryParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.error.kind {
            ParseErrorKind::Syntax(err) => Display::fmt(err, f),
            ParseErrorKind::Invalid { span, message } => match Span::new(&self.query_string, span.start, span.end) {
                Some(located) => Display::fmt(&query::Error::new_from_span(located, message.clone()), f),
                None => write!(f, "{message} (at byte {} of {:?})", span.start, self.query_string),
            },
        }
    }
}

/// Where the records were read from.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input {
    Stdin,
    FilePath(String),
}

impl Error {
    pub(crate) fn from_io_error(error: io::Error, file: Input) -> Self {
        Error::FileReadError(file, error)
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::FilePath(file) => write!(f, "file {file:?}"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::QueryParse(err) => {
                writeln!(f, "Syntax error in select specifier:")?;
                writeln!(f, "{err}")
            }
            Error::GedParse(input, err) => {
                writeln!(f, "Record parse error in {input}:")?;
                writeln!(f, "{err}")
            }
            Error::Select(err) => {
                writeln!(f, "Selection error:")?;
                writeln!(f, "{err}")
            }
            Error::FileReadError(file, err) => {
                if env::var("GEDQ_PORTABLE_ERRORS").unwrap_or_default().is_empty() {
                    writeln!(f, "{err} while reading {file}")
                } else {
                    writeln!(f, "{} while reading {file}", err.kind())
                }
            }
            Error::Output(err) => writeln!(f, "{err} while writing output"),
        }
    }
}

/// Everything [`run`] needs from the outside world.
///
/// The `gedq` binary implements this against the real stdin, filesystem and stdout; tests implement it in memory.
pub trait OsFacade {
    /// Reads all of stdin.
    fn read_stdin(&self) -> io::Result<String>;

    /// Reads the whole file at `path`.
    fn read_file(&self, path: &str) -> io::Result<String>;

    /// Where results go.
    fn stdout(&mut self) -> impl Write;

    /// Reports a failure. Called at most once per run.
    fn write_error(&mut self, err: Error);

    /// Reads the input, and reports which input it was.
    ///
    /// The default implementation (which you should feel free to use) treats a missing path, or the path `"-"`, as
    /// stdin.
    fn read_input(&self, ged_file_path: Option<&str>) -> Result<(Input, String), Error> {
        match ged_file_path {
            None | Some("-") => self
                .read_stdin()
                .map(|contents| (Input::Stdin, contents))
                .map_err(|err| Error::from_io_error(err, Input::Stdin)),
            Some(path) => {
                let input = Input::FilePath(path.to_string());
                match self.read_file(path) {
                    Ok(contents) => Ok((input, contents)),
                    Err(err) => Err(Error::from_io_error(err, input)),
                }
            }
        }
    }
}

/// Runs gedq end to end.
///
/// This uses the provided [RunOptions] and [OsFacade] to parse the selector string in [`RunOptions::selectors`], read
/// and parse the input into a [`GedDoc`], run the query against it, and then write the results to the given
/// [`OsFacade`] in the format specified by [`RunOptions::output`].
///
/// Returns whether anything was selected. Any error is passed to [`OsFacade::write_error`], and counts as nothing
/// selected.
pub fn run(cli: &RunOptions, os: &mut impl OsFacade) -> bool {
    match run_or_error(cli, os) {
        Ok(ok) => ok,
        Err(err) => {
            os.write_error(err);
            false
        }
    }
}

fn run_or_error(cli: &RunOptions, os: &mut impl OsFacade) -> Result<bool, Error> {
    // Parse the query first, so that a typo doesn't have to wait for (or consume) stdin.
    let selectors_str = &cli.selectors;
    let query: SelectQuery = match selectors_str.try_into() {
        Ok(query) => query,
        Err(error) => {
            return Err(Error::QueryParse(QueryParseError {
                query_string: selectors_str.to_string(),
                error,
            }));
        }
    };

    let (input, contents) = os.read_input(cli.ged_file_path.as_deref())?;
    let parse_options = ParseOptions::from(cli);
    let doc = GedDoc::parse_with(&contents, &parse_options).map_err(|err| Error::GedParse(input, err))?;

    let selection = query.run(&doc).map_err(Error::Select)?;
    let found_any = !selection.is_empty();

    if !cli.quiet {
        let mut stdout = os.stdout();
        match cli.output {
            OutputFormat::Plain => {
                PlainWriter::with_options(cli.into())
                    .write(&selection, &mut stdout)
                    .map_err(Error::Output)?;
            }
            OutputFormat::Json => {
                let serializable = SerializableSelection::new(&selection, cli.shallow)
                    .map_err(|err| Error::Output(io::Error::other(err)))?;
                serde_json::to_writer(&mut stdout, &serializable).map_err(|err| Error::Output(err.into()))?;
                writeln!(stdout).map_err(Error::Output)?;
            }
        }
    }

    Ok(found_any)
}
