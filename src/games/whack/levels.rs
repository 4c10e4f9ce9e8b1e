use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::LevelTableError;

/// One row of the difficulty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub level: u32,
    pub score_threshold: u32,
    pub spawn_interval_ms: u64,
    pub display_duration_ms: u64,
}

impl LevelSpec {
    pub const fn new(level: u32, score_threshold: u32, spawn_interval_ms: u64, display_duration_ms: u64) -> Self {
        Self { level, score_threshold, spawn_interval_ms, display_duration_ms }
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_duration_ms)
    }
}

pub const DEFAULT_LEVELS: [LevelSpec; 5] = [
    LevelSpec::new(1, 0, 1000, 800),
    LevelSpec::new(2, 50, 800, 700),
    LevelSpec::new(3, 100, 600, 600),
    LevelSpec::new(4, 200, 500, 500),
    LevelSpec::new(5, 350, 400, 400),
];

/// Ordered, validated level table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    levels: Vec<LevelSpec>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self { levels: DEFAULT_LEVELS.to_vec() }
    }
}

impl LevelTable {
    pub fn new(levels: Vec<LevelSpec>) -> Result<Self, LevelTableError> {
        if levels.is_empty() {
            return Err(LevelTableError::Empty);
        }

        let mut previous: Option<&LevelSpec> = None;
        for (i, spec) in levels.iter().enumerate() {
            let expected = i as u32 + 1;
            if spec.level != expected {
                return Err(LevelTableError::OutOfSequence { expected, found: spec.level });
            }
            if spec.spawn_interval_ms == 0 || spec.display_duration_ms == 0 {
                return Err(LevelTableError::ZeroDuration(spec.level));
            }
            if let Some(prev) = previous {
                if spec.score_threshold < prev.score_threshold {
                    return Err(LevelTableError::DecreasingThreshold {
                        level: spec.level,
                        threshold: spec.score_threshold,
                        previous: prev.score_threshold,
                    });
                }
            }
            previous = Some(spec);
        }

        Ok(Self { levels })
    }

    /// Row for `level`, falling back to the first row for unknown levels
    pub fn spec_for(&self, level: u32) -> &LevelSpec {
        self.levels
            .iter()
            .find(|l| l.level == level)
            .unwrap_or(&self.levels[0])
    }

    /// The row after `level`, if any
    pub fn next_after(&self, level: u32) -> Option<&LevelSpec> {
        self.levels.iter().find(|l| l.level == level + 1)
    }

    /// Highest level whose threshold `score` has reached
    pub fn level_for_score(&self, score: u32) -> u32 {
        self.levels
            .iter()
            .take_while(|l| score >= l.score_threshold)
            .last()
            .map_or(1, |l| l.level)
    }

    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        let table = LevelTable::new(DEFAULT_LEVELS.to_vec()).unwrap();
        assert_eq!(table, LevelTable::default());
        assert_eq!(table.max_level(), 5);
    }

    #[test]
    fn level_for_score_is_monotonic() {
        let table = LevelTable::default();
        let mut last = 0;
        for score in (0..=500).step_by(10) {
            let level = table.level_for_score(score);
            assert!(level >= last, "score {score} dropped to level {level}");
            last = level;
        }
        assert_eq!(table.level_for_score(0), 1);
        assert_eq!(table.level_for_score(49), 1);
        assert_eq!(table.level_for_score(50), 2);
        assert_eq!(table.level_for_score(350), 5);
        assert_eq!(table.level_for_score(10_000), 5);
    }

    #[test]
    fn unknown_level_falls_back_to_first_row() {
        let table = LevelTable::default();
        assert_eq!(table.spec_for(99), &DEFAULT_LEVELS[0]);
        assert!(table.next_after(5).is_none());
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(LevelTable::new(vec![]), Err(LevelTableError::Empty));
        assert_eq!(
            LevelTable::new(vec![LevelSpec::new(2, 0, 1000, 800)]),
            Err(LevelTableError::OutOfSequence { expected: 1, found: 2 })
        );
        assert_eq!(
            LevelTable::new(vec![LevelSpec::new(1, 50, 1000, 800), LevelSpec::new(2, 10, 800, 700)]),
            Err(LevelTableError::DecreasingThreshold { level: 2, threshold: 10, previous: 50 })
        );
        assert_eq!(
            LevelTable::new(vec![LevelSpec::new(1, 0, 0, 800)]),
            Err(LevelTableError::ZeroDuration(1))
        );
    }
}
