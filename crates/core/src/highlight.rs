//! Shared highlight slot for the chart, the stat cards and the move list

use serde::{Deserialize, Serialize};

use crate::classify::Category;
use crate::dataset::ClassifiedPosition;

/// At most one highlight target is active at a time
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Highlight {
    #[default]
    None,
    Category(Category),
    Move(String),
}

/// What the user clicked: a stat card or a top-moves entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum HighlightTarget {
    Category(Category),
    Move(String),
}

impl HighlightTarget {
    fn into_highlight(self) -> Highlight {
        match self {
            HighlightTarget::Category(c) => Highlight::Category(c),
            HighlightTarget::Move(san) => Highlight::Move(san),
        }
    }
}

impl Highlight {
    /// Clicking the active target clears it; any other target replaces it directly
    pub fn toggle(&mut self, target: HighlightTarget) {
        let next = target.into_highlight();
        *self = if *self == next { Highlight::None } else { next };
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Highlight::None)
    }

    /// Whether a chart dot belongs to the highlighted group
    pub fn matches(&self, position: &ClassifiedPosition) -> bool {
        match self {
            Highlight::None => false,
            Highlight::Category(c) => position.classification.category == *c,
            Highlight::Move(san) => position.position.best_move.san == *san,
        }
    }
}
