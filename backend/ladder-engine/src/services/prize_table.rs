use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::models::game::GameStatus;

pub const DEFAULT_PRIZES: [u64; 15] = [
    100, 200, 300, 500, 1_000, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 125_000, 250_000,
    500_000, 1_000_000,
];

pub const DEFAULT_FIREPROOF_LEVELS: [usize; 3] = [4, 9, 14];

/// Prize value per ladder level plus the fireproof checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPrizeTable")]
pub struct PrizeTable {
    values: Vec<u64>,
    fireproof_levels: BTreeSet<usize>,
}

/// Wire shape of [`PrizeTable`]; deserialization goes through [`PrizeTable::new`].
#[derive(Deserialize)]
struct RawPrizeTable {
    values: Vec<u64>,
    fireproof_levels: BTreeSet<usize>,
}

impl TryFrom<RawPrizeTable> for PrizeTable {
    type Error = GameError;

    fn try_from(raw: RawPrizeTable) -> Result<Self, Self::Error> {
        PrizeTable::new(raw.values, raw.fireproof_levels)
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self {
            values: DEFAULT_PRIZES.to_vec(),
            fireproof_levels: DEFAULT_FIREPROOF_LEVELS.into_iter().collect(),
        }
    }
}

impl PrizeTable {
    pub fn new(
        values: Vec<u64>,
        fireproof_levels: impl IntoIterator<Item = usize>,
    ) -> Result<Self, GameError> {
        if values.is_empty() {
            return Err(GameError::InvalidPrizeTable(
                "at least one level is required".to_string(),
            ));
        }
        if values.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(GameError::InvalidPrizeTable(format!(
                "values must be strictly increasing: {:?}",
                values
            )));
        }

        let fireproof_levels: BTreeSet<usize> = fireproof_levels.into_iter().collect();
        if let Some(&level) = fireproof_levels.iter().find(|&&level| level >= values.len()) {
            return Err(GameError::InvalidPrizeTable(format!(
                "fireproof level {} is outside the table of {} levels",
                level,
                values.len()
            )));
        }

        Ok(Self {
            values,
            fireproof_levels,
        })
    }

    /// Number of ladder levels.
    pub fn max_level(&self) -> usize {
        self.values.len()
    }

    pub fn value_at(&self, level: usize) -> Option<u64> {
        self.values.get(level).copied()
    }

    pub fn top_prize(&self) -> u64 {
        self.values.last().copied().unwrap_or(0)
    }

    pub fn is_fireproof(&self, level: usize) -> bool {
        self.fireproof_levels.contains(&level)
    }

    pub fn fireproof_levels(&self) -> impl Iterator<Item = usize> + '_ {
        self.fireproof_levels.iter().copied()
    }

    /// Value of the highest checkpoint at or below `level`, 0 if none was reached.
    pub fn fireproof_floor(&self, level: usize) -> u64 {
        self.fireproof_levels
            .range(..=level)
            .next_back()
            .and_then(|&checkpoint| self.value_at(checkpoint))
            .unwrap_or(0)
    }

    /// Final prize for a game that ended with `outcome` while at `level`.
    pub fn payout_for(&self, level: usize, outcome: GameStatus) -> u64 {
        match outcome {
            GameStatus::Won => self.top_prize(),
            GameStatus::Money => level
                .checked_sub(1)
                .and_then(|completed| self.value_at(completed))
                .unwrap_or(0),
            GameStatus::Fail | GameStatus::Timeout => self.fireproof_floor(level),
            GameStatus::InProgress => 0,
        }
    }
}
