//! Select and query records in a GEDCOM-style hierarchical record file.
//!
//! Each line of the input is `<level> [@<pointer>@ ]<tag>[ <value>]`, and each line is nested under the closest
//! preceding line whose level is one less:
//!
//! ```text
//! 0 @I1@ INDI
//! 1 NAME John /Smith/
//! 1 FAMC @F1@
//! 0 @F1@ FAM
//! 1 WIFE @I2@
//! ```
//!
//! This crate parses that into a [`GedDoc`]: an immutable tree of [`record::Record`]s, plus a registry of the
//! pointers they declare. You then query it through a [`select::Selector`], whose operations filter, navigate and
//! project records, and chain together freely.
//!
//! ```
//! use gedq::GedDoc;
//!
//! let doc = GedDoc::parse(
//!     "0 @I1@ INDI\n1 NAME John /Smith/\n1 FAMC @F1@\n0 @F1@ FAM\n1 WIFE @I2@\n0 @I2@ INDI\n1 NAME Mary /Jones/\n",
//! )
//! .unwrap();
//!
//! let mother = doc
//!     .all()
//!     .tag("INDI")
//!     .attr_equal("NAME", &["John /Smith/"])
//!     .deref("FAMC")
//!     .unwrap()
//!     .deref("WIFE")
//!     .unwrap()
//!     .get_attr(&["NAME"]);
//! assert_eq!(mother, vec!["Mary /Jones/"]);
//! ```
//!
//! The same chain can also be written as text, which is what the `gedq` CLI takes:
//!
//! ```
//! use gedq::GedDoc;
//! use gedq::select::{SelectQuery, Selection};
//!
//! let doc = GedDoc::parse("0 @I1@ INDI\n1 NAME John /Smith/\n1 SEX M\n").unwrap();
//! let query = SelectQuery::try_from(r#"tag INDI | attr_equal NAME "John /Smith/" | get_attr SEX"#).unwrap();
//! assert_eq!(query.run(&doc).unwrap(), Selection::Values(vec!["M"]));
//! ```
//!
//! See the [`run`] module to run a whole query (input, parse, select, output) in-process.

pub mod output;
mod query;
pub mod record;
pub mod run;
pub mod select;

pub use query::ParseError;
pub use record::GedDoc;
