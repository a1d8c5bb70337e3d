use uuid::Uuid;

use crate::models::lifeline::Lifeline;

/// Failures raised by the game aggregate, the factory and the rule tables.
///
/// Every variant is reported before any state is mutated, so a caller that
/// receives one of these can keep using the game as it was.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("game is already finished")]
    GameAlreadyFinished,

    #[error("invalid answer slot label: {0:?}")]
    InvalidSlotLabel(String),

    #[error("unknown lifeline: {0:?}")]
    UnknownLifeline(String),

    #[error("lifeline {0} has already been used in this game")]
    LifelineAlreadyUsed(Lifeline),

    #[error("no question available for level {level}")]
    InsufficientQuestionPool { level: usize },

    #[error("invalid question template {id}: {reason}")]
    InvalidQuestionTemplate { id: String, reason: String },

    #[error("invalid prize table: {0}")]
    InvalidPrizeTable(String),

    #[error("invalid ladder rules: {0}")]
    InvalidRules(String),

    #[error("question repository failed: {0}")]
    QuestionRepository(#[source] anyhow::Error),
}

/// Failures raised by [`crate::services::game_service::GameService`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("game {0} not found")]
    GameNotFound(Uuid),

    #[error("game belongs to another user")]
    AccessDenied,

    #[error("user already has a game in progress: {0}")]
    ActiveGameExists(Uuid),

    #[error("balance ledger failed: {0}")]
    Ledger(#[source] anyhow::Error),

    #[error(transparent)]
    Game(#[from] GameError),
}
