mod line;
mod lines;
mod registry;
mod tree;

pub use registry::*;
pub use tree::*;
