use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::models::question::Slot;

/// One-shot hints available once per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifeline {
    FiftyFifty,
    AudienceHelp,
    FriendCall,
}

impl Lifeline {
    pub const ALL: [Lifeline; 3] = [
        Lifeline::FiftyFifty,
        Lifeline::AudienceHelp,
        Lifeline::FriendCall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "fifty_fifty",
            Lifeline::AudienceHelp => "audience_help",
            Lifeline::FriendCall => "friend_call",
        }
    }
}

impl fmt::Display for Lifeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifeline {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lifeline::ALL
            .into_iter()
            .find(|lifeline| lifeline.as_str() == s.trim())
            .ok_or_else(|| GameError::UnknownLifeline(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Sure,
    Thinks,
    Guesses,
}

impl Confidence {
    pub fn phrase(self) -> &'static str {
        match self {
            Confidence::Sure => "is sure",
            Confidence::Thinks => "thinks",
            Confidence::Guesses => "guesses",
        }
    }
}

/// Hint data stored on a question once a lifeline has been played on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HelpPayload {
    /// The two slots left after removing two wrong answers.
    FiftyFifty { slots: BTreeSet<Slot> },
    /// Percentage of the simulated audience voting for each slot.
    AudienceHelp { distribution: BTreeMap<Slot, u8> },
    FriendCall {
        slot: Slot,
        confidence: Confidence,
        message: String,
    },
}

impl HelpPayload {
    pub fn lifeline(&self) -> Lifeline {
        match self {
            HelpPayload::FiftyFifty { .. } => Lifeline::FiftyFifty,
            HelpPayload::AudienceHelp { .. } => Lifeline::AudienceHelp,
            HelpPayload::FriendCall { .. } => Lifeline::FriendCall,
        }
    }
}
