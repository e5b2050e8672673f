//! Multi-dimensional filtering over the position dataset

mod engine;
mod state;

pub use engine::{filter_positions, is_visible};
pub use state::{BehindPawnFilter, FilterChange, FilterState, ScoreRange};
