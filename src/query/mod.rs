mod args;
mod error;
mod pest;
mod step_try_from;

pub use error::*;

pub use self::pest::Error;
pub(crate) use self::pest::{Pair, Pairs, Query};
