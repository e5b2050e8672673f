//! Category taxonomy for Chess960 best moves

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fixed categories (16 pawn tags, Knight, Castling)
pub const CATEGORY_COUNT: usize = 18;

/// Bucket a position's best move falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    A3,
    A4,
    B3,
    B4,
    C3,
    C4,
    D3,
    D4,
    E3,
    E4,
    F3,
    F4,
    G3,
    G4,
    H3,
    H4,
    Knight,
    Castling,
}

/// How far a pawn was pushed from its start square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PawnPush {
    /// Lands on rank 3
    Single,
    /// Lands on rank 4
    Double,
}

impl PawnPush {
    pub fn from_rank(rank: char) -> Option<Self> {
        match rank {
            '3' => Some(PawnPush::Single),
            '4' => Some(PawnPush::Double),
            _ => None,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            PawnPush::Single => 0.5,
            PawnPush::Double => 0.9,
        }
    }
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::A3,
        Category::A4,
        Category::B3,
        Category::B4,
        Category::C3,
        Category::C4,
        Category::D3,
        Category::D4,
        Category::E3,
        Category::E4,
        Category::F3,
        Category::F4,
        Category::G3,
        Category::G4,
        Category::H3,
        Category::H4,
        Category::Knight,
        Category::Castling,
    ];

    /// Pawn category for a file index (0 = a) and push distance
    pub fn pawn(file: usize, push: PawnPush) -> Option<Self> {
        if file >= 8 {
            return None;
        }
        let offset = match push {
            PawnPush::Single => 0,
            PawnPush::Double => 1,
        };
        Some(Self::ALL[file * 2 + offset])
    }

    /// Stable position of this category in [`Category::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_pawn(&self) -> bool {
        !matches!(self, Category::Knight | Category::Castling)
    }

    /// File index (0 = a) for pawn categories
    pub fn file_index(&self) -> Option<usize> {
        self.is_pawn().then(|| self.index() / 2)
    }

    pub fn push(&self) -> Option<PawnPush> {
        if !self.is_pawn() {
            return None;
        }
        Some(if self.index() % 2 == 0 {
            PawnPush::Single
        } else {
            PawnPush::Double
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::A3 => "A3",
            Category::A4 => "A4",
            Category::B3 => "B3",
            Category::B4 => "B4",
            Category::C3 => "C3",
            Category::C4 => "C4",
            Category::D3 => "D3",
            Category::D4 => "D4",
            Category::E3 => "E3",
            Category::E4 => "E4",
            Category::F3 => "F3",
            Category::F4 => "F4",
            Category::G3 => "G3",
            Category::G4 => "G4",
            Category::H3 => "H3",
            Category::H4 => "H4",
            Category::Knight => "Knight",
            Category::Castling => "Castling",
        }
    }

    /// Label shown on stat cards ("e4", "Knight", "Castling")
    pub fn display_name(&self) -> String {
        if self.is_pawn() {
            self.as_str().to_lowercase()
        } else {
            self.as_str().to_string()
        }
    }

    pub fn color(&self) -> Rgb {
        match self.file_index() {
            Some(file) => FILE_PALETTE[file],
            None if *self == Category::Knight => KNIGHT_COLOR,
            None => CASTLING_COLOR,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.push().map(|p| p.opacity()).unwrap_or(1.0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

/// Display color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

/// One hue per file, shared by the rank-3 and rank-4 tags of that file
pub const FILE_PALETTE: [Rgb; 8] = [
    Rgb(0x1f, 0x77, 0xb4),
    Rgb(0xff, 0x7f, 0x0e),
    Rgb(0x2c, 0xa0, 0x2c),
    Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd),
    Rgb(0x8c, 0x56, 0x4b),
    Rgb(0xe3, 0x77, 0xc2),
    Rgb(0x7f, 0x7f, 0x7f),
];

pub const KNIGHT_COLOR: Rgb = Rgb(0xbc, 0xbd, 0x22);
pub const CASTLING_COLOR: Rgb = Rgb(0x17, 0xbe, 0xcf);

/// Cached result of classifying a best move
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub color: Rgb,
    pub opacity: f32,
}

impl Classification {
    pub fn of(category: Category) -> Self {
        Self {
            category,
            color: category.color(),
            opacity: category.opacity(),
        }
    }
}
