use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GameError;
use crate::models::lifeline::{HelpPayload, Lifeline};
use crate::models::question::{GameQuestion, Slot};
use crate::services::lifeline_service;
use crate::services::prize_table::PrizeTable;
use crate::utils::time::elapsed_between;

pub const DEFAULT_TIME_LIMIT_SECONDS: i64 = 35 * 60;
pub const DEFAULT_FRIEND_CALL_ACCURACY: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Fail,
    Timeout,
    Money,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::InProgress => "in_progress",
            GameStatus::Won => "won",
            GameStatus::Fail => "fail",
            GameStatus::Timeout => "timeout",
            GameStatus::Money => "money",
        }
    }

    /// Label shown to players.
    pub fn display_label(self) -> &'static str {
        match self {
            GameStatus::InProgress => "in progress",
            GameStatus::Won => "won",
            GameStatus::Fail => "loss",
            GameStatus::Timeout => "timed out",
            GameStatus::Money => "cash-out",
        }
    }
}

/// Rules frozen into a game when it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderRules {
    pub prize_table: PrizeTable,
    pub time_limit_seconds: i64,
    pub friend_call_accuracy: f64,
}

impl Default for LadderRules {
    fn default() -> Self {
        Self {
            prize_table: PrizeTable::default(),
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            friend_call_accuracy: DEFAULT_FRIEND_CALL_ACCURACY,
        }
    }
}

impl LadderRules {
    pub fn new(
        prize_table: PrizeTable,
        time_limit_seconds: i64,
        friend_call_accuracy: f64,
    ) -> Result<Self, GameError> {
        if time_limit_seconds <= 0 {
            return Err(GameError::InvalidRules(format!(
                "time limit must be positive, got {}s",
                time_limit_seconds
            )));
        }
        if Duration::try_seconds(time_limit_seconds).is_none() {
            return Err(GameError::InvalidRules(format!(
                "time limit of {}s is out of range",
                time_limit_seconds
            )));
        }
        if !(0.0..=1.0).contains(&friend_call_accuracy) {
            return Err(GameError::InvalidRules(format!(
                "friend call accuracy must be within 0..=1, got {}",
                friend_call_accuracy
            )));
        }

        Ok(Self {
            prize_table,
            time_limit_seconds,
            friend_call_accuracy,
        })
    }

    pub fn max_level(&self) -> usize {
        self.prize_table.max_level()
    }

    /// Saturates instead of panicking for limits set without [`LadderRules::new`].
    pub fn time_limit(&self) -> Duration {
        Duration::try_seconds(self.time_limit_seconds).unwrap_or(Duration::MAX)
    }
}

/// What happened to a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// Correct, and the game continues at `level`.
    Advanced { level: usize },
    Won { prize: u64 },
    Failed { correct_slot: Slot, prize: u64 },
    /// Time ran out before the answer was looked at.
    TimedOut { prize: u64 },
}

impl AnswerOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnswerOutcome::Advanced { .. } | AnswerOutcome::Won { .. })
    }
}

/// The game aggregate. Only the transition methods below change its state,
/// and none of them do anything once the status is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub user_id: String,
    pub current_level: usize,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub prize: u64,
    pub used_lifelines: BTreeSet<Lifeline>,
    /// One question per level, index == level.
    pub questions: Vec<GameQuestion>,
    pub rules: LadderRules,
}

impl Game {
    pub fn new(
        user_id: &str,
        questions: Vec<GameQuestion>,
        rules: LadderRules,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            current_level: 0,
            status: GameStatus::InProgress,
            created_at,
            finished_at: None,
            prize: 0,
            used_lifelines: BTreeSet::new(),
            questions,
            rules,
        }
    }

    pub fn max_level(&self) -> usize {
        self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// `None` once every question has been answered.
    pub fn current_question(&self) -> Option<&GameQuestion> {
        self.questions.get(self.current_level)
    }

    /// Level of the last answered question, -1 before the first answer.
    pub fn previous_level(&self) -> i64 {
        self.current_level as i64 - 1
    }

    pub fn is_lifeline_used(&self, lifeline: Lifeline) -> bool {
        self.used_lifelines.contains(&lifeline)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Utc::now())
    }

    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        elapsed_between(self.created_at, now)
    }

    pub fn remaining_time(&self) -> Duration {
        self.remaining_time_at(Utc::now())
    }

    pub fn remaining_time_at(&self, now: DateTime<Utc>) -> Duration {
        (self.rules.time_limit() - self.elapsed_at(now)).max(Duration::zero())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.elapsed_at(now) > self.rules.time_limit()
    }

    pub fn answer_current_question(&mut self, label: &str) -> Result<AnswerOutcome, GameError> {
        self.answer_current_question_at(label, Utc::now())
    }

    pub fn answer_current_question_at(
        &mut self,
        label: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, GameError> {
        self.ensure_in_progress()?;
        let slot: Slot = label.parse()?;

        if self.is_expired_at(now) {
            self.finish(GameStatus::Timeout, now);
            return Ok(AnswerOutcome::TimedOut { prize: self.prize });
        }

        let question = self
            .current_question()
            .ok_or(GameError::GameAlreadyFinished)?;
        let correct_slot = question.correct_slot();

        if slot != correct_slot {
            self.finish(GameStatus::Fail, now);
            return Ok(AnswerOutcome::Failed {
                correct_slot,
                prize: self.prize,
            });
        }

        self.current_level += 1;
        if self.current_level >= self.max_level() {
            self.finish(GameStatus::Won, now);
            return Ok(AnswerOutcome::Won { prize: self.prize });
        }

        tracing::debug!(
            "Game {} advanced to level {}",
            self.id,
            self.current_level
        );
        Ok(AnswerOutcome::Advanced {
            level: self.current_level,
        })
    }

    /// Cash out with the value of the last completed level. An expired game
    /// times out instead. Returns the final status.
    pub fn take_money(&mut self) -> Result<GameStatus, GameError> {
        self.take_money_at(Utc::now())
    }

    pub fn take_money_at(&mut self, now: DateTime<Utc>) -> Result<GameStatus, GameError> {
        self.ensure_in_progress()?;

        if self.is_expired_at(now) {
            self.finish(GameStatus::Timeout, now);
        } else {
            self.finish(GameStatus::Money, now);
        }
        Ok(self.status)
    }

    /// Plays `lifeline` on the current question and returns the hint.
    pub fn use_help<R: Rng + ?Sized>(
        &mut self,
        lifeline: Lifeline,
        rng: &mut R,
    ) -> Result<HelpPayload, GameError> {
        self.ensure_in_progress()?;
        if self.used_lifelines.contains(&lifeline) {
            return Err(GameError::LifelineAlreadyUsed(lifeline));
        }

        let accuracy = self.rules.friend_call_accuracy;
        let question = self
            .questions
            .get_mut(self.current_level)
            .ok_or(GameError::GameAlreadyFinished)?;

        let payload = lifeline_service::generate(lifeline, question.correct_slot(), accuracy, rng);
        let payload = question.record_help(lifeline, payload).clone();
        self.used_lifelines.insert(lifeline);

        tracing::debug!("Game {} used lifeline {}", self.id, lifeline);
        Ok(payload)
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameAlreadyFinished);
        }
        Ok(())
    }

    fn finish(&mut self, status: GameStatus, now: DateTime<Utc>) {
        self.status = status;
        self.prize = self.rules.prize_table.payout_for(self.current_level, status);
        self.finished_at = Some(now);

        tracing::info!(
            "Game finished: game={}, user={}, status={:?}, level={}, prize={}",
            self.id,
            self.user_id,
            status,
            self.current_level,
            self.prize
        );
    }
}
