//! Hint generators for the three lifelines.
//!
//! These functions only look at the correct slot and the random source they
//! are given; the once-per-game bookkeeping lives on [`crate::models::game::Game`].

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use rand::Rng;

use crate::models::lifeline::{Confidence, HelpPayload, Lifeline};
use crate::models::question::Slot;

/// Share of the audience voting for the correct slot.
const AUDIENCE_CORRECT_SHARE: RangeInclusive<u8> = 40..=85;

pub fn generate<R: Rng + ?Sized>(
    lifeline: Lifeline,
    correct: Slot,
    friend_call_accuracy: f64,
    rng: &mut R,
) -> HelpPayload {
    match lifeline {
        Lifeline::FiftyFifty => HelpPayload::FiftyFifty {
            slots: fifty_fifty(correct, rng),
        },
        Lifeline::AudienceHelp => HelpPayload::AudienceHelp {
            distribution: audience_distribution(correct, rng),
        },
        Lifeline::FriendCall => {
            let (slot, confidence) = friend_guess(correct, friend_call_accuracy, rng);
            HelpPayload::FriendCall {
                slot,
                confidence,
                message: friend_message(slot, confidence),
            }
        }
    }
}

/// Correct slot plus one random wrong slot.
pub fn fifty_fifty<R: Rng + ?Sized>(correct: Slot, rng: &mut R) -> BTreeSet<Slot> {
    let wrong = wrong_slots(correct);
    let kept = wrong[rng.random_range(0..wrong.len())];
    [correct, kept].into_iter().collect()
}

/// Percentages per slot, always summing to 100.
pub fn audience_distribution<R: Rng + ?Sized>(correct: Slot, rng: &mut R) -> BTreeMap<Slot, u8> {
    let correct_share = rng.random_range(AUDIENCE_CORRECT_SHARE);
    let rest = 100 - correct_share;

    let mut cuts = [rng.random_range(0..=rest), rng.random_range(0..=rest)];
    cuts.sort_unstable();
    let shares = [cuts[0], cuts[1] - cuts[0], rest - cuts[1]];

    let mut distribution: BTreeMap<Slot, u8> = wrong_slots(correct).into_iter().zip(shares).collect();
    distribution.insert(correct, correct_share);
    distribution
}

/// The slot the friend names. Right with probability `accuracy`, otherwise a
/// random wrong slot.
pub fn friend_guess<R: Rng + ?Sized>(
    correct: Slot,
    accuracy: f64,
    rng: &mut R,
) -> (Slot, Confidence) {
    let accuracy = if accuracy.is_nan() {
        1.0
    } else {
        accuracy.clamp(0.0, 1.0)
    };

    let slot = if rng.random_bool(accuracy) {
        correct
    } else {
        let wrong = wrong_slots(correct);
        wrong[rng.random_range(0..wrong.len())]
    };

    let confidence = match rng.random_range(0..3) {
        0 => Confidence::Sure,
        1 => Confidence::Thinks,
        _ => Confidence::Guesses,
    };

    (slot, confidence)
}

pub fn friend_message(slot: Slot, confidence: Confidence) -> String {
    format!(
        "Your friend {} the answer is {}",
        confidence.phrase(),
        slot.as_char().to_ascii_uppercase()
    )
}

fn wrong_slots(correct: Slot) -> Vec<Slot> {
    Slot::ALL
        .into_iter()
        .filter(|&slot| slot != correct)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::DEFAULT_FRIEND_CALL_ACCURACY;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fifty_fifty_keeps_correct_and_one_wrong() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for correct in Slot::ALL {
                let kept = fifty_fifty(correct, &mut rng);
                assert_eq!(kept.len(), 2);
                assert!(kept.contains(&correct));
            }
        }
    }

    #[test]
    fn audience_distribution_sums_to_100() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let distribution = audience_distribution(Slot::C, &mut rng);

            assert_eq!(distribution.len(), 4);
            assert_eq!(
                distribution.values().map(|&share| u32::from(share)).sum::<u32>(),
                100
            );
        }
    }

    #[test]
    fn audience_favours_correct_slot_on_average() {
        let mut rng = StdRng::seed_from_u64(99);
        let trials = 500;
        let total: u32 = (0..trials)
            .map(|_| u32::from(audience_distribution(Slot::A, &mut rng)[&Slot::A]))
            .sum();

        assert!(total / trials > 25, "average share {}", total / trials);
    }

    #[test]
    fn friend_with_full_accuracy_is_always_right() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let (slot, _) = friend_guess(Slot::D, 1.0, &mut rng);
            assert_eq!(slot, Slot::D);
        }
    }

    #[test]
    fn friend_with_zero_accuracy_is_always_wrong() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let (slot, _) = friend_guess(Slot::D, 0.0, &mut rng);
            assert_ne!(slot, Slot::D);
        }
    }

    #[test]
    fn friend_with_default_accuracy_is_usually_but_not_always_right() {
        let mut rng = StdRng::seed_from_u64(11);
        let calls = 2_000;
        let right = (0..calls)
            .filter(|_| {
                let (slot, _) = friend_guess(Slot::A, DEFAULT_FRIEND_CALL_ACCURACY, &mut rng);
                slot == Slot::A
            })
            .count();

        let rate = right as f64 / calls as f64;
        assert!(rate > 0.7 && rate < 0.9, "friend was right {} of the time", rate);
    }

    #[test]
    fn friend_message_names_the_slot() {
        let message = friend_message(Slot::B, Confidence::Thinks);
        assert_eq!(message, "Your friend thinks the answer is B");
    }

    #[test]
    fn generate_is_reproducible_with_seed() {
        let a = generate(Lifeline::FriendCall, Slot::A, 0.8, &mut StdRng::seed_from_u64(5));
        let b = generate(Lifeline::FriendCall, Slot::A, 0.8, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
        assert_eq!(a.lifeline(), Lifeline::FriendCall);
    }
}
