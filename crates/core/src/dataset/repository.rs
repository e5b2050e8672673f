//! Immutable store of the 960 classified positions

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::models::*;
use super::record::DatasetFile;
use crate::classify::classify;
use crate::error::{Error, Result};

pub struct PositionRepository {
    positions: Vec<ClassifiedPosition>,
}

impl PositionRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::DataLoad(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: DatasetFile = serde_json::from_str(json)
            .map_err(|e| Error::DataLoad(format!("malformed dataset: {}", e)))?;
        let records = file.into_records();

        // The engine pipeline numbers positions from 0
        let offset = if records.iter().any(|r| r.number == 0) { 1 } else { 0 };

        let positions = records
            .into_iter()
            .map(|r| r.into_position(offset))
            .collect::<Result<Vec<_>>>()?;

        Self::from_positions(positions)
    }

    /// Validates numbering and classifies every position once.
    ///
    /// Fails with `DataIntegrity` listing every unclassifiable position rather
    /// than dropping them.
    pub fn from_positions(mut positions: Vec<Position>) -> Result<Self> {
        if positions.len() != DATASET_SIZE {
            return Err(Error::DataLoad(format!(
                "expected {} positions, found {}",
                DATASET_SIZE,
                positions.len()
            )));
        }

        positions.sort_by_key(|p| p.number);
        let numbers: BTreeSet<u32> = positions.iter().map(|p| p.number).collect();
        let in_range = positions
            .iter()
            .all(|p| (1..=DATASET_SIZE as u32).contains(&p.number));
        if numbers.len() != DATASET_SIZE || !in_range {
            return Err(Error::DataLoad(format!(
                "position numbers must be unique and within 1..={}",
                DATASET_SIZE
            )));
        }

        let mut offenders = Vec::new();
        let mut classified = Vec::with_capacity(DATASET_SIZE);
        for position in positions {
            match classify(&position.best_move) {
                Ok(classification) => classified.push(ClassifiedPosition {
                    position,
                    classification,
                }),
                Err(reason) => {
                    warn!(
                        number = position.number,
                        san = %position.best_move.san,
                        %reason,
                        "Unclassifiable best move"
                    );
                    offenders.push(position.number);
                }
            }
        }

        if !offenders.is_empty() {
            return Err(Error::DataIntegrity { positions: offenders });
        }

        info!(positions = classified.len(), "Loaded and classified dataset");
        Ok(Self { positions: classified })
    }

    /// All positions in ascending number order
    pub fn positions(&self) -> &[ClassifiedPosition] {
        &self.positions
    }

    pub fn get(&self, number: u32) -> Option<&ClassifiedPosition> {
        let index = number.checked_sub(1)? as usize;
        self.positions.get(index)
    }

    /// Lowest and highest evaluation score in the dataset
    pub fn score_bounds(&self) -> (i32, i32) {
        let scores = self.positions.iter().map(|p| p.position.evaluation_score);
        let lo = scores.clone().min().unwrap_or(0);
        let hi = scores.max().unwrap_or(0);
        (lo, hi)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Category, CATEGORY_COUNT};
    use crate::testing::{dataset_json, descriptor, full_positions};

    #[test]
    fn test_loads_full_dataset() {
        let repo = PositionRepository::from_json_str(&dataset_json()).unwrap();
        assert_eq!(repo.len(), DATASET_SIZE);
        assert_eq!(repo.get(1).unwrap().number(), 1);
        assert_eq!(repo.get(960).unwrap().number(), 960);
        assert!(repo.get(0).is_none());
        assert!(repo.get(961).is_none());
    }

    #[test]
    fn test_every_position_has_one_of_the_categories() {
        let repo = PositionRepository::from_positions(full_positions()).unwrap();
        let mut seen = BTreeSet::new();
        for p in repo.positions() {
            assert!(Category::ALL.contains(&p.classification.category));
            seen.insert(p.classification.category);
        }
        assert_eq!(seen.len(), CATEGORY_COUNT);
    }

    #[test]
    fn test_zero_based_numbers_are_shifted() {
        let mut positions = full_positions();
        for p in &mut positions {
            p.number -= 1;
        }
        let json = serde_json::to_string(&positions).unwrap();
        let repo = PositionRepository::from_json_str(&json).unwrap();
        assert_eq!(repo.positions()[0].number(), 1);
        assert_eq!(repo.positions()[959].number(), 960);
    }

    #[test]
    fn test_number_overflow_after_shift_is_load_error() {
        let mut positions = full_positions();
        for p in &mut positions {
            p.number -= 1;
        }
        positions[959].number = u32::MAX;
        let json = serde_json::to_string(&positions).unwrap();
        assert!(matches!(
            PositionRepository::from_json_str(&json),
            Err(Error::DataLoad(_))
        ));
    }

    #[test]
    fn test_wrong_count_is_load_error() {
        let mut positions = full_positions();
        positions.pop();
        let err = PositionRepository::from_positions(positions).err().unwrap();
        assert!(matches!(err, Error::DataLoad(_)));
    }

    #[test]
    fn test_duplicate_numbers_are_load_error() {
        let mut positions = full_positions();
        positions[1].number = 1;
        assert!(matches!(
            PositionRepository::from_positions(positions),
            Err(Error::DataLoad(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_load_error() {
        assert!(matches!(
            PositionRepository::from_json_str("{not json"),
            Err(Error::DataLoad(_))
        ));
    }

    #[test]
    fn test_unclassifiable_moves_abort_load_with_numbers() {
        let mut positions = full_positions();
        for number in [7u32, 300] {
            let p = &mut positions[number as usize - 1];
            p.best_move = descriptor("Kf1", "g1f1", PieceKind::King, "g1", "f1", 0);
        }
        match PositionRepository::from_positions(positions) {
            Err(Error::DataIntegrity { positions }) => assert_eq!(positions, vec![7, 300]),
            other => panic!("expected integrity error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_score_bounds() {
        let repo = PositionRepository::from_positions(full_positions()).unwrap();
        assert_eq!(repo.score_bounds(), (-10, 50));
    }
}
