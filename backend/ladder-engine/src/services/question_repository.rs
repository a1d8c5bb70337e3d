use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

use crate::models::question::QuestionTemplate;

/// Source of question templates, keyed by difficulty level.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Returns one template per requested level. Levels with nothing
    /// available are left out of the result.
    async fn fetch_questions_for_levels(
        &self,
        levels: &BTreeSet<usize>,
    ) -> Result<BTreeMap<usize, QuestionTemplate>>;
}

/// Question bank held in memory; picks a random template per level.
pub struct InMemoryQuestionRepository {
    questions: Vec<QuestionTemplate>,
    rng: Mutex<StdRng>,
}

impl InMemoryQuestionRepository {
    pub fn new(questions: Vec<QuestionTemplate>) -> Self {
        Self {
            questions,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_seed(questions: Vec<QuestionTemplate>, seed: u64) -> Self {
        Self {
            questions,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Loads a JSON array of question templates.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read question bank {}", path.display()))?;
        let questions: Vec<QuestionTemplate> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse question bank {}", path.display()))?;

        tracing::info!(
            "Loaded {} questions from {}",
            questions.len(),
            path.display()
        );
        Ok(Self::new(questions))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn fetch_questions_for_levels(
        &self,
        levels: &BTreeSet<usize>,
    ) -> Result<BTreeMap<usize, QuestionTemplate>> {
        let mut rng = self.rng.lock().await;
        let mut picked = BTreeMap::new();

        for &level in levels {
            let candidates: Vec<&QuestionTemplate> = self
                .questions
                .iter()
                .filter(|question| question.level == level)
                .collect();

            if candidates.is_empty() {
                tracing::warn!("No questions available for level {}", level);
                continue;
            }

            let choice = candidates[rng.random_range(0..candidates.len())];
            picked.insert(level, choice.clone());
        }

        Ok(picked)
    }
}
