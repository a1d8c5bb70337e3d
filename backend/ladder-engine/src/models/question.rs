use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::models::lifeline::{HelpPayload, Lifeline};

/// Every question offers exactly this many answers.
pub const ANSWER_COUNT: usize = 4;

/// Answer slot label shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    A,
    B,
    C,
    D,
}

impl Slot {
    pub const ALL: [Slot; ANSWER_COUNT] = [Slot::A, Slot::B, Slot::C, Slot::D];

    pub fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
            Slot::C => 2,
            Slot::D => 3,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Slot::A => 'a',
            Slot::B => 'b',
            Slot::C => 'c',
            Slot::D => 'd',
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Slot {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Slot::A),
            "b" => Ok(Slot::B),
            "c" => Ok(Slot::C),
            "d" => Ok(Slot::D),
            _ => Err(GameError::InvalidSlotLabel(s.to_string())),
        }
    }
}

/// Question as stored in the question bank. Read-only to the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTemplate {
    pub id: String,
    pub level: usize,
    pub text: String,
    pub answers: [String; ANSWER_COUNT],
    /// Position of the right answer inside `answers`.
    #[serde(default)]
    pub correct_index: usize,
}

impl QuestionTemplate {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.correct_index >= ANSWER_COUNT {
            return Err(GameError::InvalidQuestionTemplate {
                id: self.id.clone(),
                reason: format!("correct answer index {} out of range", self.correct_index),
            });
        }
        Ok(())
    }
}

/// A question bound to one game: the template, its fixed slot scramble and
/// the hints produced for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameQuestion {
    pub question: QuestionTemplate,
    /// `slots[slot.index()]` is the template answer shown under `slot`.
    slots: [usize; ANSWER_COUNT],
    correct_slot: Slot,
    #[serde(default)]
    help_payloads: BTreeMap<Lifeline, HelpPayload>,
}

impl GameQuestion {
    pub fn new(question: QuestionTemplate, slots: [usize; ANSWER_COUNT]) -> Result<Self, GameError> {
        question.validate()?;

        let mut seen = [false; ANSWER_COUNT];
        for &original in &slots {
            if original >= ANSWER_COUNT || seen[original] {
                return Err(GameError::InvalidQuestionTemplate {
                    id: question.id.clone(),
                    reason: format!("slot mapping {:?} is not a permutation", slots),
                });
            }
            seen[original] = true;
        }

        let correct_slot = Slot::ALL
            .into_iter()
            .find(|slot| slots[slot.index()] == question.correct_index)
            .ok_or_else(|| GameError::InvalidQuestionTemplate {
                id: question.id.clone(),
                reason: "correct answer is not mapped to any slot".to_string(),
            })?;

        Ok(Self {
            question,
            slots,
            correct_slot,
            help_payloads: BTreeMap::new(),
        })
    }

    pub fn level(&self) -> usize {
        self.question.level
    }

    pub fn text(&self) -> &str {
        &self.question.text
    }

    /// Answer texts in the order the player sees them.
    pub fn variants(&self) -> BTreeMap<Slot, &str> {
        Slot::ALL
            .into_iter()
            .map(|slot| (slot, self.question.answers[self.slots[slot.index()]].as_str()))
            .collect()
    }

    pub fn original_index(&self, slot: Slot) -> usize {
        self.slots[slot.index()]
    }

    pub fn correct_slot(&self) -> Slot {
        self.correct_slot
    }

    pub fn is_correct(&self, slot: Slot) -> bool {
        slot == self.correct_slot
    }

    pub fn help(&self, lifeline: Lifeline) -> Option<&HelpPayload> {
        self.help_payloads.get(&lifeline)
    }

    pub fn help_payloads(&self) -> &BTreeMap<Lifeline, HelpPayload> {
        &self.help_payloads
    }

    /// Stores a hint. A hint already recorded for `lifeline` is kept as is.
    pub(crate) fn record_help(&mut self, lifeline: Lifeline, payload: HelpPayload) -> &HelpPayload {
        self.help_payloads.entry(lifeline).or_insert(payload)
    }
}
