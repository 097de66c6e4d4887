//! Writers for a [`Selection`](crate::select::Selection): plain text, or JSON via [`serde`].

mod json;
mod plain;

pub use json::*;
pub use plain::*;
