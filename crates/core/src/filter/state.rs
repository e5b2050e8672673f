//! Filter state value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::classify::{Category, CATEGORY_COUNT};
use crate::dataset::PieceKind;

/// Inclusive evaluation-score window, `lo <= hi` at all times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreRange {
    lo: i32,
    hi: i32,
}

impl ScoreRange {
    /// Builds a range, collapsing crossed bounds onto `hi`
    pub fn new(lo: i32, hi: i32) -> Self {
        Self { lo: lo.min(hi), hi }
    }

    pub fn lo(&self) -> i32 {
        self.lo
    }

    pub fn hi(&self) -> i32 {
        self.hi
    }

    pub fn contains(&self, score: i32) -> bool {
        (self.lo..=self.hi).contains(&score)
    }

    /// Moves the lower handle; a drag past `hi` stops at `hi`
    pub fn drag_lo(&mut self, lo: i32) {
        if lo > self.hi {
            debug!(requested = lo, clamped = self.hi, "Lower score bound clamped");
        }
        self.lo = lo.min(self.hi);
    }

    /// Moves the upper handle; a drag below `lo` stops at `lo`
    pub fn drag_hi(&mut self, hi: i32) {
        if hi < self.lo {
            debug!(requested = hi, clamped = self.lo, "Upper score bound clamped");
        }
        self.hi = hi.max(self.lo);
    }
}

/// Which back-rank pieces may stand behind a pawn best move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "pieces", rename_all = "snake_case")]
pub enum BehindPawnFilter {
    Any,
    Only(BTreeSet<PieceKind>),
}

impl BehindPawnFilter {
    pub fn allows(&self, piece: PieceKind) -> bool {
        match self {
            BehindPawnFilter::Any => true,
            BehindPawnFilter::Only(allowed) => allowed.contains(&piece),
        }
    }

    /// Flips one piece in or out of the allowed set; leaving "any" starts
    /// from every back-rank piece except the toggled one
    pub fn toggle(&mut self, piece: PieceKind) {
        let mut allowed = match std::mem::replace(self, BehindPawnFilter::Any) {
            BehindPawnFilter::Any => PieceKind::BACK_RANK.iter().copied().collect(),
            BehindPawnFilter::Only(set) => set,
        };
        if !allowed.remove(&piece) {
            allowed.insert(piece);
        }
        *self = BehindPawnFilter::Only(allowed);
    }
}

/// A single user action on the filter panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterChange {
    ToggleCategory { category: Category },
    SetCategory { category: Category, enabled: bool },
    SetAllCategories { enabled: bool },
    SetScoreLow { value: i32 },
    SetScoreHigh { value: i32 },
    SetBehindPawn { filter: BehindPawnFilter },
    ToggleBehindPawnPiece { piece: PieceKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    enabled: BTreeSet<Category>,
    score_range: ScoreRange,
    behind_pawn: BehindPawnFilter,
}

impl FilterState {
    /// All 18 categories, the full score range and any piece behind the pawn
    pub fn defaults(score_bounds: (i32, i32)) -> Self {
        Self {
            enabled: Category::ALL.iter().copied().collect(),
            score_range: ScoreRange::new(score_bounds.0, score_bounds.1),
            behind_pawn: BehindPawnFilter::Any,
        }
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled.contains(&category)
    }

    pub fn enabled_categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.enabled.iter().copied()
    }

    pub fn all_enabled(&self) -> bool {
        self.enabled.len() == CATEGORY_COUNT
    }

    pub fn score_range(&self) -> ScoreRange {
        self.score_range
    }

    pub fn behind_pawn(&self) -> &BehindPawnFilter {
        &self.behind_pawn
    }

    pub fn set_category(&mut self, category: Category, enabled: bool) {
        if enabled {
            self.enabled.insert(category);
        } else {
            self.enabled.remove(&category);
        }
    }

    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::ToggleCategory { category } => {
                let enabled = !self.is_enabled(category);
                self.set_category(category, enabled);
            }
            FilterChange::SetCategory { category, enabled } => self.set_category(category, enabled),
            FilterChange::SetAllCategories { enabled } => {
                for category in Category::ALL {
                    self.set_category(category, enabled);
                }
            }
            FilterChange::SetScoreLow { value } => self.score_range.drag_lo(value),
            FilterChange::SetScoreHigh { value } => self.score_range.drag_hi(value),
            FilterChange::SetBehindPawn { filter } => self.behind_pawn = filter,
            FilterChange::ToggleBehindPawnPiece { piece } => self.behind_pawn.toggle(piece),
        }
    }
}
