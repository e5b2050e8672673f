//! Move classification for Chess960 best moves

mod classifier;
mod types;

pub use classifier::{classify, Unclassifiable};
pub use types::*;
