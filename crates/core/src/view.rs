//! View-model handed to the presentation layer

use serde::Serialize;

use crate::classify::{Category, Rgb};
use crate::dataset::{ClassifiedPosition, MoveDescriptor, PiecesBehindPawn};
use crate::filter::FilterState;
use crate::highlight::Highlight;
use crate::stats::Statistics;

/// Allowance used when counting near-best alternatives
pub const DEFAULT_ALLOWANCE_CP: i32 = 25;

/// One chart dot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotView {
    pub number: u32,
    pub category: Category,
    pub color: Rgb,
    pub opacity: f32,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub dots: Vec<DotView>,
    pub statistics: Statistics,
    pub highlight: Highlight,
    pub filter: FilterState,
}

/// Everything known about a single position, for a detail panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionDetail {
    pub number: u32,
    pub fen: String,
    pub piece_order: String,
    pub category: Category,
    pub best_move: MoveDescriptor,
    pub evaluation_score: i32,
    pub top_moves: Vec<String>,
    pub pieces_behind_pawn: Option<PiecesBehindPawn>,
    pub near_best_count: usize,
    pub visible: bool,
}

impl PositionDetail {
    pub fn new(p: &ClassifiedPosition, visible: bool) -> Self {
        let position = &p.position;
        Self {
            number: position.number,
            fen: position.fen.clone(),
            piece_order: position.piece_order.to_string(),
            category: p.classification.category,
            best_move: position.best_move.clone(),
            evaluation_score: position.evaluation_score,
            top_moves: format_top_moves(&position.top_moves),
            pieces_behind_pawn: position.pieces_behind_pawn(),
            near_best_count: position.alternatives_within(DEFAULT_ALLOWANCE_CP).len(),
            visible,
        }
    }
}

/// Numbered lines such as `1. e4 (+35)`
pub fn format_top_moves(moves: &[MoveDescriptor]) -> Vec<String> {
    moves
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let score = if m.score >= 0 {
                format!("+{}", m.score)
            } else {
                m.score.to_string()
            };
            format!("{}. {} ({})", i + 1, m.san, score)
        })
        .collect()
}
