use std::sync::Arc;

use crate::config::Config;
use balance_ledger::InMemoryBalanceLedger;
use game_service::GameService;
use question_repository::InMemoryQuestionRepository;

/// In-process wiring of the game service with the in-memory collaborators.
pub struct AppState {
    pub config: Config,
    pub games: GameService,
    pub ledger: Arc<InMemoryBalanceLedger>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let rules = config.ladder_rules()?;

        let repository = match config.question_bank_path.as_deref() {
            Some(path) => InMemoryQuestionRepository::from_json_file(path)?,
            None => {
                tracing::warn!("No question bank configured, starting with an empty pool");
                InMemoryQuestionRepository::new(Vec::new())
            }
        };
        let ledger = Arc::new(InMemoryBalanceLedger::new());

        let games = GameService::new(
            Arc::new(repository),
            ledger.clone(),
            rules,
            config.rng_seed,
        );

        tracing::info!("Game service initialized");

        Ok(Self {
            config,
            games,
            ledger,
        })
    }
}

pub mod balance_ledger;
pub mod game_factory;
pub mod game_service;
pub mod lifeline_service;
pub mod prize_table;
pub mod question_repository;
pub mod shuffler;
