use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::{GameError, ServiceError};
use crate::metrics;
use crate::models::game::{AnswerOutcome, Game, GameStatus, LadderRules};
use crate::models::lifeline::{HelpPayload, Lifeline};
use crate::services::balance_ledger::BalanceLedger;
use crate::services::game_factory::GameFactory;
use crate::services::question_repository::QuestionRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settlement {
    Crediting,
    Failed,
}

#[derive(Default)]
struct GameStore {
    games: HashMap<Uuid, Game>,
    /// user id -> game in progress
    active: HashMap<String, Uuid>,
    /// Finished games whose prize is not in the ledger yet.
    unsettled: HashMap<Uuid, Settlement>,
}

/// Owns the games of all users and drives them through their transitions.
///
/// Enforces at most one game in progress per user and pays the final prize
/// into the balance ledger exactly once, after the game lock is released.
/// A failed credit does not undo the transition: the game stays finished and
/// its prize waits for [`GameService::settle_pending`].
///
/// Finished games are kept until [`GameService::evict_finished`] drops them;
/// archiving them elsewhere is up to the embedding application.
pub struct GameService {
    factory: GameFactory,
    ledger: Arc<dyn BalanceLedger>,
    rng: Mutex<StdRng>,
    store: RwLock<GameStore>,
}

impl GameService {
    pub fn new(
        repository: Arc<dyn QuestionRepository>,
        ledger: Arc<dyn BalanceLedger>,
        rules: LadderRules,
        rng_seed: Option<u64>,
    ) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            factory: GameFactory::new(repository, rules),
            ledger,
            rng: Mutex::new(rng),
            store: RwLock::new(GameStore::default()),
        }
    }

    pub fn rules(&self) -> &LadderRules {
        self.factory.rules()
    }

    pub async fn create_game(&self, user_id: &str) -> Result<Game, ServiceError> {
        if let Some(game_id) = self.active_game_id(user_id).await {
            tracing::warn!(
                "User {} tried to start a game while {} is in progress",
                user_id,
                game_id
            );
            return Err(ServiceError::ActiveGameExists(game_id));
        }

        let templates = self.factory.fetch_templates().await?;
        let game = {
            let mut rng = self.rng.lock().await;
            self.factory.assemble(user_id, templates, &mut *rng)?
        };

        let mut store = self.store.write().await;
        // Re-checked under the write lock: another request may have won the race.
        if let Some(&game_id) = store.active.get(user_id) {
            return Err(ServiceError::ActiveGameExists(game_id));
        }
        store.active.insert(user_id.to_string(), game.id);
        store.games.insert(game.id, game.clone());
        drop(store);

        metrics::record_game_created();
        tracing::info!("Game created: {} for user: {}", game.id, user_id);

        Ok(game)
    }

    pub async fn get_game(&self, user_id: &str, game_id: Uuid) -> Result<Game, ServiceError> {
        let store = self.store.read().await;
        let game = store
            .games
            .get(&game_id)
            .ok_or(ServiceError::GameNotFound(game_id))?;

        if game.user_id != user_id {
            tracing::warn!("User {} denied access to game {}", user_id, game_id);
            return Err(ServiceError::AccessDenied);
        }
        Ok(game.clone())
    }

    pub async fn active_game_id(&self, user_id: &str) -> Option<Uuid> {
        self.store.read().await.active.get(user_id).copied()
    }

    pub async fn answer(
        &self,
        user_id: &str,
        game_id: Uuid,
        label: &str,
    ) -> Result<AnswerOutcome, ServiceError> {
        let (outcome, _) = self
            .apply(user_id, game_id, |game| {
                let outcome = game.answer_current_question(label)?;
                if !matches!(outcome, AnswerOutcome::TimedOut { .. }) {
                    metrics::record_answer(outcome.is_success());
                }
                Ok(outcome)
            })
            .await?;

        Ok(outcome)
    }

    pub async fn take_money(&self, user_id: &str, game_id: Uuid) -> Result<Game, ServiceError> {
        let (_, game) = self
            .apply(user_id, game_id, |game| game.take_money())
            .await?;

        Ok(game)
    }

    pub async fn use_help(
        &self,
        user_id: &str,
        game_id: Uuid,
        lifeline: Lifeline,
    ) -> Result<HelpPayload, ServiceError> {
        let mut rng = self.rng.lock().await;
        let (payload, _) = self
            .apply(user_id, game_id, |game| game.use_help(lifeline, &mut *rng))
            .await?;
        drop(rng);

        metrics::record_lifeline(lifeline);
        Ok(payload)
    }

    /// Runs `action` on the user's game under the write lock, then settles the
    /// game if the action finished it.
    async fn apply<T, F>(
        &self,
        user_id: &str,
        game_id: Uuid,
        action: F,
    ) -> Result<(T, Game), ServiceError>
    where
        F: FnOnce(&mut Game) -> Result<T, GameError>,
    {
        let (result, snapshot) = {
            let mut store = self.store.write().await;
            let game = store
                .games
                .get_mut(&game_id)
                .ok_or(ServiceError::GameNotFound(game_id))?;

            if game.user_id != user_id {
                tracing::warn!("User {} denied access to game {}", user_id, game_id);
                return Err(ServiceError::AccessDenied);
            }

            let result = action(game)?;
            let snapshot = game.clone();

            // Transitions are rejected on finished games, so a finished
            // snapshot here means this call finished it.
            if snapshot.is_finished() {
                store.active.remove(user_id);
                if snapshot.prize > 0 {
                    store.unsettled.insert(game_id, Settlement::Crediting);
                }
            }
            (result, snapshot)
        };

        if snapshot.is_finished() {
            metrics::record_game_finished(snapshot.status, snapshot.prize);
            tracing::info!(
                "Settling game {}: status={}, prize={}",
                snapshot.id,
                snapshot.status.display_label(),
                snapshot.prize
            );

            if snapshot.prize > 0 && self.credit(&snapshot).await.is_err() {
                tracing::warn!(
                    "Game {} finished with prize {} pending in the ledger",
                    snapshot.id,
                    snapshot.prize
                );
            }
        }

        Ok((result, snapshot))
    }

    /// Pays the prize of `game` and updates its settlement state. The caller
    /// must have marked the game as `Crediting`.
    async fn credit(&self, game: &Game) -> Result<(), ServiceError> {
        let result = self.ledger.credit(&game.user_id, game.prize).await;

        let mut store = self.store.write().await;
        match result {
            Ok(()) => {
                store.unsettled.remove(&game.id);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    "Failed to credit prize {} for game {}: {}",
                    game.prize,
                    game.id,
                    e
                );
                store.unsettled.insert(game.id, Settlement::Failed);
                Err(ServiceError::Ledger(e))
            }
        }
    }

    /// Retries the ledger credit of a finished game whose earlier credit
    /// failed. Returns the amount credited, 0 when nothing is pending.
    pub async fn settle_pending(&self, user_id: &str, game_id: Uuid) -> Result<u64, ServiceError> {
        let game = {
            let mut store = self.store.write().await;
            let game = store
                .games
                .get(&game_id)
                .ok_or(ServiceError::GameNotFound(game_id))?;

            if game.user_id != user_id {
                tracing::warn!("User {} denied access to game {}", user_id, game_id);
                return Err(ServiceError::AccessDenied);
            }
            let game = game.clone();

            match store.unsettled.get_mut(&game_id) {
                Some(state) if *state == Settlement::Failed => *state = Settlement::Crediting,
                _ => return Ok(0),
            }
            game
        };

        tracing::info!("Retrying credit of {} for game {}", game.prize, game.id);
        self.credit(&game).await?;
        Ok(game.prize)
    }

    /// Games whose prize credit failed and can be retried.
    pub async fn unsettled_games(&self) -> Vec<Uuid> {
        let store = self.store.read().await;
        let mut ids: Vec<Uuid> = store
            .unsettled
            .iter()
            .filter(|(_, state)| **state == Settlement::Failed)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// Drops finished and settled games from memory. Returns how many were removed.
    pub async fn evict_finished(&self) -> usize {
        let mut guard = self.store.write().await;
        let store = &mut *guard;
        let before = store.games.len();

        let unsettled = &store.unsettled;
        store
            .games
            .retain(|id, game| !game.is_finished() || unsettled.contains_key(id));

        let evicted = before - store.games.len();
        if evicted > 0 {
            tracing::debug!("Evicted {} finished games", evicted);
        }
        evicted
    }

    /// Number of stored games currently in `status`.
    pub async fn count_by_status(&self, status: GameStatus) -> usize {
        self.store
            .read()
            .await
            .games
            .values()
            .filter(|game| game.status == status)
            .count()
    }
}
