//! Best-move classification

use super::types::*;
use crate::dataset::{file_index, MoveDescriptor, PieceKind};

/// Why a move could not be mapped to a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unclassifiable {
    /// Pawn move landing outside ranks 3 and 4
    PawnRank(char),
    /// Neither a pawn push, a knight move nor castling
    Piece(PieceKind),
}

impl std::fmt::Display for Unclassifiable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unclassifiable::PawnRank(rank) => write!(f, "pawn move to rank {}", rank),
            Unclassifiable::Piece(piece) => write!(f, "{} move is not castling", piece.name()),
        }
    }
}

/// Maps a best move to its category, color and opacity.
///
/// Castling is recognised from the SAN before the moved piece is looked at,
/// so a castling move is a `Castling` whatever piece it is annotated with.
pub fn classify(mv: &MoveDescriptor) -> Result<Classification, Unclassifiable> {
    if mv.is_castle() {
        return Ok(Classification::of(Category::Castling));
    }

    match mv.piece_moved {
        PieceKind::Pawn => {
            let rank = mv.to_square.rank().char();
            let push = PawnPush::from_rank(rank).ok_or(Unclassifiable::PawnRank(rank))?;
            let category = Category::pawn(file_index(mv.to_square), push)
                .ok_or(Unclassifiable::PawnRank(rank))?;
            Ok(Classification::of(category))
        }
        PieceKind::Knight => Ok(Classification::of(Category::Knight)),
        other => Err(Unclassifiable::Piece(other)),
    }
}
