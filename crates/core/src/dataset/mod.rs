//! Chess960 position dataset

mod models;
mod record;
mod repository;

pub use models::*;
pub use repository::PositionRepository;
