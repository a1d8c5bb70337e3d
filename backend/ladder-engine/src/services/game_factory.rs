use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::GameError;
use crate::models::game::{Game, LadderRules};
use crate::models::question::{GameQuestion, QuestionTemplate};
use crate::services::question_repository::QuestionRepository;
use crate::services::shuffler;

/// Builds new games from the question repository.
///
/// The caller must make sure the user has no game in progress; the factory
/// does not look at other games.
pub struct GameFactory {
    repository: Arc<dyn QuestionRepository>,
    rules: LadderRules,
}

impl GameFactory {
    pub fn new(repository: Arc<dyn QuestionRepository>, rules: LadderRules) -> Self {
        Self { repository, rules }
    }

    pub fn rules(&self) -> &LadderRules {
        &self.rules
    }

    pub async fn create_game<R: Rng + Send + ?Sized>(
        &self,
        user_id: &str,
        rng: &mut R,
    ) -> Result<Game, GameError> {
        let templates = self.fetch_templates().await?;
        self.assemble(user_id, templates, rng)
    }

    /// Fetches one template for every ladder level.
    pub async fn fetch_templates(&self) -> Result<BTreeMap<usize, QuestionTemplate>, GameError> {
        let levels: BTreeSet<usize> = (0..self.rules.max_level()).collect();

        self.repository
            .fetch_questions_for_levels(&levels)
            .await
            .map_err(GameError::QuestionRepository)
    }

    pub fn assemble<R: Rng + ?Sized>(
        &self,
        user_id: &str,
        templates: BTreeMap<usize, QuestionTemplate>,
        rng: &mut R,
    ) -> Result<Game, GameError> {
        assemble_game(user_id, templates, &self.rules, rng, Utc::now())
    }
}

/// Builds a game from already fetched templates, shuffling each question
/// independently.
pub fn assemble_game<R: Rng + ?Sized>(
    user_id: &str,
    mut templates: BTreeMap<usize, QuestionTemplate>,
    rules: &LadderRules,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<Game, GameError> {
    let mut questions = Vec::with_capacity(rules.max_level());

    for level in 0..rules.max_level() {
        let template = templates
            .remove(&level)
            .ok_or(GameError::InsufficientQuestionPool { level })?;

        if template.level != level {
            return Err(GameError::InvalidQuestionTemplate {
                id: template.id,
                reason: format!("has level {} but was supplied for level {}", template.level, level),
            });
        }

        let shuffle = shuffler::shuffle(template.correct_index, rng).map_err(|e| match e {
            GameError::InvalidQuestionTemplate { reason, .. } => GameError::InvalidQuestionTemplate {
                id: template.id.clone(),
                reason,
            },
            other => other,
        })?;
        questions.push(GameQuestion::new(template, shuffle.slots)?);
    }

    let game = Game::new(user_id, questions, rules.clone(), now);
    tracing::info!(
        "Game assembled: game={}, user={}, levels={}",
        game.id,
        user_id,
        game.max_level()
    );
    Ok(game)
}
