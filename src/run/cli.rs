use crate::output;
use clap::{Parser, ValueEnum};
use derive_builder::Builder;
use std::fmt::{Display, Formatter};

macro_rules! create_options_structs {
    (
        $(
            $(#[$meta:meta])*
            clap $clap:tt
            pub $name:ident : $ty:ty
        ),* $(,)?
    ) => {
        #[derive(Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Parser)]
        #[command(version, about, long_about = None)]
        #[doc(hidden)]
        pub struct CliOptions {
            $(
            $(#[$meta])*
            #[arg$clap]
            pub(crate) $name: $ty,
            )*

            // clap-only stuff:

            /// The selector chain, as a single string: steps separated by "|".
            ///
            /// For example: 'tag INDI | attr_equal NAME "John /Smith/" | deref FAMC | get_attr WIFE'.
            /// If absent or empty, all top-level records are selected.
            #[arg(value_name = "selectors")]
            pub(crate) selectors: Option<String>,

            /// The record file to read, by path. If not provided (or "-"), standard input will be used.
            #[arg(value_name = "file")]
            pub(crate) ged_file_path: Option<String>,
        }

        /// Options analogous to the gedq CLI's switches.
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Builder)]
        #[builder(default)]
        pub struct RunOptions {
            $(
            $(#[$meta])*
            pub $name: $ty,
            )*

            pub selectors: String,

            /// The file to read. `None` or `"-"` mean stdin.
            pub ged_file_path: Option<String>,
        }

        impl From<CliOptions> for RunOptions {
            fn from(value: CliOptions) -> Self {
                Self {
                    $($name: value.$name,)*
                    selectors: value.selectors.unwrap_or_default(),
                    ged_file_path: value.ged_file_path,
                }
            }
        }
    };
}

create_options_structs! {
    /// Specifies the output format. Defaults to plain.
    clap(long, short, default_value_t = OutputFormat::Plain)
    pub output: OutputFormat,

    /// Only print the selected records' own lines, not the records nested under them.
    clap(long)
    pub shallow: bool,

    /// Quiet: do not print anything to stdout. The exit code will still be 0 if anything matches, and non-0 if nothing
    /// does.
    clap(long, short)
    pub quiet: bool,

    /// Fail if two records declare the same pointer. By default, the later declaration wins.
    clap(long)
    pub strict_pointers: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output: OutputFormat::Plain,
            shallow: false,
            quiet: false,
            strict_pointers: false,
            selectors: String::new(),
            ged_file_path: None,
        }
    }
}

impl From<&RunOptions> for output::PlainWriterOptions {
    fn from(cli: &RunOptions) -> Self {
        output::PlainWriterOptions { shallow: cli.shallow }
    }
}

impl From<&RunOptions> for crate::record::ParseOptions {
    fn from(cli: &RunOptions) -> Self {
        crate::record::ParseOptions {
            reject_duplicate_pointers: cli.strict_pointers,
        }
    }
}

/// Output formats, analogous to `--output` in the CLI.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum OutputFormat {
    /// Records as an indented outline (`@I1@ INDI`, with children indented two spaces per level), and values one per
    /// line.
    #[default]
    Plain,

    /// Output results as JSON. Records are objects with `tag`, `pointer`, `value` and `children` (omitted when empty);
    /// values are an array of strings; child values are an array of `[tag, value]` pairs.
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let self_str = match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
        };
        f.write_str(self_str)
    }
}
