//! Visible-subset computation

use super::state::FilterState;
use crate::dataset::ClassifiedPosition;

/// Whether a single position passes every active filter
pub fn is_visible(position: &ClassifiedPosition, state: &FilterState) -> bool {
    let category_enabled = state.is_enabled(position.classification.category);
    let score_in_range = state
        .score_range()
        .contains(position.position.evaluation_score);
    // Non-pawn best moves pass the behind-pawn filter vacuously
    let behind_pawn_ok = position
        .position
        .piece_behind_pawn()
        .map_or(true, |piece| state.behind_pawn().allows(piece));

    category_enabled && score_in_range && behind_pawn_ok
}

/// Full rescan of the dataset; an empty result is valid
pub fn filter_positions<'a>(
    positions: &'a [ClassifiedPosition],
    state: &FilterState,
) -> Vec<&'a ClassifiedPosition> {
    positions.iter().filter(|p| is_visible(p, state)).collect()
}
