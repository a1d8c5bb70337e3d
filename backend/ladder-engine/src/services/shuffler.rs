use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::GameError;
use crate::models::question::{Slot, ANSWER_COUNT};

/// Result of scrambling one question's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shuffle {
    /// `slots[slot.index()]` is the original answer position shown under `slot`.
    pub slots: [usize; ANSWER_COUNT],
    pub correct_slot: Slot,
}

/// Uniformly random assignment of the original answers to slots `a..d`.
pub fn shuffle<R: Rng + ?Sized>(correct_index: usize, rng: &mut R) -> Result<Shuffle, GameError> {
    if correct_index >= ANSWER_COUNT {
        return Err(GameError::InvalidQuestionTemplate {
            id: String::new(),
            reason: format!("correct answer index {} out of range", correct_index),
        });
    }

    let mut slots = [0, 1, 2, 3];
    slots.shuffle(rng);

    let correct_slot = Slot::ALL
        .into_iter()
        .find(|slot| slots[slot.index()] == correct_index)
        .ok_or_else(|| GameError::InvalidQuestionTemplate {
            id: String::new(),
            reason: "shuffle lost the correct answer".to_string(),
        })?;

    Ok(Shuffle {
        slots,
        correct_slot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn shuffle_is_a_bijection() {
        let mut rng = StdRng::seed_from_u64(7);
        for correct_index in 0..ANSWER_COUNT {
            let result = shuffle(correct_index, &mut rng).unwrap();

            let mut sorted = result.slots;
            sorted.sort_unstable();
            assert_eq!(sorted, [0, 1, 2, 3]);
            assert_eq!(result.slots[result.correct_slot.index()], correct_index);
        }
    }

    #[test]
    fn same_seed_same_shuffle() {
        let a = shuffle(0, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = shuffle(0, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn correct_answer_lands_in_every_slot() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hits = [0u32; ANSWER_COUNT];
        for _ in 0..400 {
            let result = shuffle(0, &mut rng).unwrap();
            hits[result.correct_slot.index()] += 1;
        }
        assert!(hits.iter().all(|&count| count > 50), "hits: {:?}", hits);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffle(4, &mut rng).is_err());
    }
}
