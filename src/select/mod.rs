//! The selector algebra, plus the in-memory form of textual queries and their evaluation.

mod api;
mod matcher;
mod selector;
mod steps;

pub use api::*;
pub use matcher::*;
pub use selector::*;
pub use steps::*;
