//! Statistics over the visible subset

use serde::Serialize;
use std::collections::HashMap;

use crate::classify::{Category, Rgb, CATEGORY_COUNT};
use crate::dataset::{ClassifiedPosition, DATASET_SIZE};

/// Length of the ranked move list
pub const TOP_MOVES_LIMIT: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: Category,
    pub label: String,
    pub color: Rgb,
    pub opacity: f32,
    pub count: usize,
    /// Share of all 960 positions, not of the subset
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMoveStat {
    pub san: String,
    pub count: usize,
    pub percentage_of_subset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub categories: Vec<CategoryStat>,
    pub total: usize,
    pub total_percentage: f64,
    /// `None` when the subset is empty
    pub mean_score: Option<f64>,
    pub top_moves: Vec<TopMoveStat>,
}

impl Statistics {
    pub fn category(&self, category: Category) -> &CategoryStat {
        &self.categories[category.index()]
    }

    /// Mean score for display, "n/a" for an empty subset
    pub fn mean_score_label(&self) -> String {
        match self.mean_score {
            Some(mean) => format!("{:.1}", mean),
            None => "n/a".to_string(),
        }
    }
}

/// Rounds to the nearest tenth
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percent(count: usize, of: usize) -> f64 {
    if of == 0 {
        return 0.0;
    }
    round1(count as f64 * 100.0 / of as f64)
}

/// Aggregates per-category counts, mean score and the top moves of a subset
pub fn aggregate(visible: &[&ClassifiedPosition]) -> Statistics {
    let mut counts = [0usize; CATEGORY_COUNT];
    let mut move_counts: HashMap<&str, usize> = HashMap::new();
    let mut score_sum: i64 = 0;

    for p in visible {
        counts[p.classification.category.index()] += 1;
        *move_counts.entry(p.position.best_move.san.as_str()).or_insert(0) += 1;
        score_sum += p.position.evaluation_score as i64;
    }

    let categories = Category::ALL
        .iter()
        .map(|&category| CategoryStat {
            category,
            label: category.display_name(),
            color: category.color(),
            opacity: category.opacity(),
            count: counts[category.index()],
            percentage: percent(counts[category.index()], DATASET_SIZE),
        })
        .collect();

    let total = visible.len();
    let mean_score = (total > 0).then(|| score_sum as f64 / total as f64);

    let mut ranked: Vec<(&str, usize)> = move_counts.into_iter().collect();
    // Equal counts fall back to ascending SAN so the list is deterministic
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let top_moves = ranked
        .into_iter()
        .take(TOP_MOVES_LIMIT)
        .map(|(san, count)| TopMoveStat {
            san: san.to_string(),
            count,
            percentage_of_subset: percent(count, total),
        })
        .collect();

    Statistics {
        categories,
        total,
        total_percentage: percent(total, DATASET_SIZE),
        mean_score,
        top_moves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PieceOrder;
    use crate::filter::{filter_positions, FilterChange, FilterState};
    use crate::testing::{classified, full_dataset, knight_jump, pawn_push, position};

    fn standard() -> PieceOrder {
        PieceOrder::parse("RNBQKBNR").unwrap()
    }

    #[test]
    fn test_category_counts_partition_the_subset() {
        let positions = full_dataset();
        let mut state = FilterState::defaults((-10, 50));
        state.apply(FilterChange::SetScoreLow { value: 5 });
        state.apply(FilterChange::SetCategory { category: Category::C3, enabled: false });
        let visible = filter_positions(&positions, &state);
        let stats = aggregate(&visible);

        let sum: usize = stats.categories.iter().map(|c| c.count).sum();
        assert_eq!(sum, visible.len());
        assert_eq!(stats.total, visible.len());
        assert_eq!(stats.category(Category::C3).count, 0);
    }

    #[test]
    fn test_percentages_are_of_960() {
        let positions: Vec<_> = (1..=96)
            .map(|n| classified(position(n, standard(), knight_jump("g1", "f3", 0))))
            .collect();
        let visible: Vec<_> = positions.iter().collect();
        let stats = aggregate(&visible);

        assert_eq!(stats.category(Category::Knight).count, 96);
        assert_eq!(stats.category(Category::Knight).percentage, 10.0);
        assert_eq!(stats.total_percentage, 10.0);
        assert_eq!(stats.top_moves[0].percentage_of_subset, 100.0);
    }

    #[test]
    fn test_percentage_rounds_to_tenth() {
        // 1 / 960 = 0.104..%
        assert_eq!(percent(1, DATASET_SIZE), 0.1);
        // 7 / 960 = 0.729..%
        assert_eq!(percent(7, DATASET_SIZE), 0.7);
    }

    #[test]
    fn test_empty_subset() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.total_percentage, 0.0);
        assert!(stats.categories.iter().all(|c| c.count == 0 && c.percentage == 0.0));
        assert_eq!(stats.mean_score, None);
        assert_eq!(stats.mean_score_label(), "n/a");
        assert!(stats.top_moves.is_empty());
    }

    #[test]
    fn test_mean_score() {
        let positions = vec![
            classified(position(1, standard(), pawn_push("e2", "e4", 30))),
            classified(position(2, standard(), pawn_push("d2", "d4", -5))),
        ];
        let visible: Vec<_> = positions.iter().collect();
        let stats = aggregate(&visible);
        assert_eq!(stats.mean_score, Some(12.5));
        assert_eq!(stats.mean_score_label(), "12.5");
    }

    #[test]
    fn test_top_moves_ties_sorted_by_san() {
        let positions = vec![
            classified(position(1, standard(), pawn_push("g2", "g3", 0))),
            classified(position(2, standard(), pawn_push("b2", "b3", 0))),
            classified(position(3, standard(), knight_jump("g1", "f3", 0))),
            classified(position(4, standard(), pawn_push("e2", "e4", 0))),
            classified(position(5, standard(), pawn_push("e2", "e4", 0))),
        ];
        let visible: Vec<_> = positions.iter().collect();
        let sans: Vec<String> = aggregate(&visible).top_moves.into_iter().map(|m| m.san).collect();
        assert_eq!(sans, vec!["e4", "Nf3", "b3", "g3"]);
    }

    #[test]
    fn test_top_moves_capped_at_fifteen() {
        let stats = aggregate(&full_dataset().iter().collect::<Vec<_>>());
        assert_eq!(stats.top_moves.len(), TOP_MOVES_LIMIT);
        assert!(stats.top_moves.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_disabling_sole_contributor_drops_move() {
        let positions = vec![
            classified(position(1, standard(), pawn_push("e2", "e4", 0))),
            classified(position(2, standard(), pawn_push("d2", "d4", 0))),
        ];
        let mut state = FilterState::defaults((0, 0));
        let before = aggregate(&filter_positions(&positions, &state));
        assert!(before.top_moves.iter().any(|m| m.san == "e4"));

        state.apply(FilterChange::ToggleCategory { category: Category::E4 });
        let after = aggregate(&filter_positions(&positions, &state));
        assert!(after.top_moves.iter().all(|m| m.san != "e4"));
        assert_eq!(after.top_moves.len(), 1);
    }
}
