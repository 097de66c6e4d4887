//! End-to-end runs.
//!
//! [`run()`] reads a record file, parses it into a [`GedDoc`](crate::GedDoc), evaluates a textual selector chain against
//! it, and writes the [`Selection`](crate::select::Selection) in plain text or JSON. That's everything the `gedq` binary
//! does, and you can do it in-process by supplying your own [`OsFacade`].
//!
//! ## Example
//!
//! ```
//! use gedq::run::{self, OsFacade, OutputFormat, RunOptionsBuilder};
//! use std::collections::HashMap;
//! use std::io;
//!
//! /// Serves files from memory, and collects whatever gets written.
//! struct InMemory {
//!     files: HashMap<&'static str, &'static str>,
//!     out: Vec<u8>,
//!     errors: Vec<String>,
//! }
//!
//! impl OsFacade for InMemory {
//!     fn read_stdin(&self) -> io::Result<String> {
//!         Ok(String::new())
//!     }
//!
//!     fn read_file(&self, path: &str) -> io::Result<String> {
//!         self.files
//!             .get(path)
//!             .map(|text| text.to_string())
//!             .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
//!     }
//!
//!     fn stdout(&mut self) -> impl io::Write {
//!         &mut self.out
//!     }
//!
//!     fn write_error(&mut self, err: run::Error) {
//!         self.errors.push(err.to_string())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut os = InMemory {
//!     files: HashMap::from([("family.ged", "0 @I1@ INDI\n1 NAME John /Smith/\n1 SEX M\n")]),
//!     out: Vec::new(),
//!     errors: Vec::new(),
//! };
//! let options = RunOptionsBuilder::default()
//!     .selectors("tag INDI | get_attr NAME SEX".to_string())
//!     .ged_file_path(Some("family.ged".to_string()))
//!     .output(OutputFormat::Json)
//!     .build()?;
//!
//! assert!(run::run(&options, &mut os));
//! assert_eq!(String::from_utf8(os.out)?, "[\"John /Smith/\",\"M\"]\n");
//! assert!(os.errors.is_empty());
//! #     Ok(())
//! # }
//! ```
mod cli;
mod run_main;

pub use cli::*;
pub use run_main::*;
