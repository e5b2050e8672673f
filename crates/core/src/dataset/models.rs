//! Position records

use serde::{Deserialize, Serialize};
use shakmaty::{Role, Square};
use std::fmt;

use crate::classify::Classification;

/// Number of Chess960 starting positions
pub const DATASET_SIZE: usize = 960;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const BACK_RANK: [PieceKind; 5] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn from_role(role: Role) -> Self {
        match role {
            Role::Pawn => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King => PieceKind::King,
        }
    }

    /// Accepts a FEN letter of either case
    pub fn from_char(c: char) -> Option<Self> {
        Role::from_char(c.to_ascii_lowercase()).map(Self::from_role)
    }

    /// Accepts a full name ("Knight") or a single letter ("N")
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_char(c);
        }
        match name.to_ascii_lowercase().as_str() {
            "pawn" => Some(PieceKind::Pawn),
            "knight" => Some(PieceKind::Knight),
            "bishop" => Some(PieceKind::Bishop),
            "rook" => Some(PieceKind::Rook),
            "queen" => Some(PieceKind::Queen),
            "king" => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Uppercase FEN letter
    pub fn letter(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }
}

/// White back rank from a1 to h1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceOrder([PieceKind; 8]);

impl PieceOrder {
    pub fn new(pieces: [PieceKind; 8]) -> Self {
        Self(pieces)
    }

    /// Parses an 8-letter back rank such as "RNBQKBNR"
    pub fn parse(letters: &str) -> Option<Self> {
        let kinds: Vec<PieceKind> = letters
            .chars()
            .map(PieceKind::from_char)
            .collect::<Option<_>>()?;
        Self::from_kinds(&kinds)
    }

    pub fn from_kinds(kinds: &[PieceKind]) -> Option<Self> {
        let pieces: [PieceKind; 8] = kinds.try_into().ok()?;
        if pieces.contains(&PieceKind::Pawn) {
            return None;
        }
        Some(Self(pieces))
    }

    /// Piece standing on the given file (0 = a)
    pub fn on_file(&self, file: usize) -> Option<PieceKind> {
        self.0.get(file).copied()
    }

    pub fn pieces(&self) -> &[PieceKind; 8] {
        &self.0
    }
}

impl fmt::Display for PieceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.0 {
            write!(f, "{}", piece.letter())?;
        }
        Ok(())
    }
}

impl Serialize for PieceOrder {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDescriptor {
    pub san: String,
    pub uci: String,
    pub piece_moved: PieceKind,
    #[serde(serialize_with = "serialize_square")]
    pub from_square: Square,
    #[serde(serialize_with = "serialize_square")]
    pub to_square: Square,
    pub score: i32,
}

impl MoveDescriptor {
    /// File index (0 = a) of the origin square
    pub fn from_file(&self) -> usize {
        file_index(self.from_square)
    }

    pub fn is_castle(&self) -> bool {
        matches!(
            self.san.trim_end_matches(&['+', '#'][..]),
            "O-O" | "O-O-O"
        )
    }
}

fn serialize_square<S: serde::Serializer>(square: &Square, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(square)
}

/// File index (0 = a) of a square
pub fn file_index(square: Square) -> usize {
    (square.file().char() as u8 - b'a') as usize
}

/// An immutable dataset record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub number: u32,
    pub fen: String,
    pub piece_order: PieceOrder,
    pub best_move: MoveDescriptor,
    pub top_moves: Vec<MoveDescriptor>,
    pub evaluation_score: i32,
}

impl Position {
    /// Castling SAN wins over a pawn annotation, matching the classifier
    fn is_pawn_best_move(&self) -> bool {
        self.best_move.piece_moved == PieceKind::Pawn && !self.best_move.is_castle()
    }

    /// Back-rank piece directly behind the start square of a pawn best move
    pub fn piece_behind_pawn(&self) -> Option<PieceKind> {
        if !self.is_pawn_best_move() {
            return None;
        }
        self.piece_order.on_file(self.best_move.from_file())
    }

    /// Back-rank pieces diagonally left, directly behind and diagonally right of
    /// a pawn best move's start square
    pub fn pieces_behind_pawn(&self) -> Option<PiecesBehindPawn> {
        if !self.is_pawn_best_move() {
            return None;
        }
        let file = self.best_move.from_file();
        Some(PiecesBehindPawn {
            diagonal_left: file.checked_sub(1).and_then(|f| self.piece_order.on_file(f)),
            directly_behind: self.piece_order.on_file(file),
            diagonal_right: self.piece_order.on_file(file + 1),
        })
    }

    /// Top moves whose score is within `allowance` centipawns of the best score
    pub fn alternatives_within(&self, allowance: i32) -> Vec<&MoveDescriptor> {
        let best = self
            .top_moves
            .iter()
            .map(|m| m.score)
            .max()
            .unwrap_or(self.best_move.score);
        self.top_moves
            .iter()
            .filter(|m| m.score >= best - allowance)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PiecesBehindPawn {
    pub diagonal_left: Option<PieceKind>,
    pub directly_behind: Option<PieceKind>,
    pub diagonal_right: Option<PieceKind>,
}

/// A position together with the classification computed once at load time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPosition {
    #[serde(flatten)]
    pub position: Position,
    pub classification: Classification,
}

impl ClassifiedPosition {
    pub fn number(&self) -> u32 {
        self.position.number
    }
}
