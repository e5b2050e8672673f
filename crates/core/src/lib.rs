//! Chess960 Explorer Core Library
//!
//! Classifies the engine's best opening move for each of the 960 starting
//! positions, filters the dataset, aggregates statistics over the visible
//! subset and tracks the shared highlight selection.

pub mod classify;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod session;
pub mod stats;
pub mod view;

#[cfg(test)]
mod testing;

pub use classify::{classify, Category, Classification};
pub use dataset::{ClassifiedPosition, MoveDescriptor, PieceKind, Position, PositionRepository};
pub use error::{Error, Result};
pub use filter::{filter_positions, BehindPawnFilter, FilterChange, FilterState};
pub use highlight::{Highlight, HighlightTarget};
pub use session::{recompute, Explorer, LoadStatus, Session};
pub use stats::{aggregate, Statistics};
pub use view::{PositionDetail, ViewModel};
