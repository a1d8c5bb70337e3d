#![allow(dead_code)]

use std::sync::Arc;

use quizladder_engine::models::{LadderRules, QuestionTemplate};
use quizladder_engine::services::balance_ledger::{BalanceLedger, InMemoryBalanceLedger};
use quizladder_engine::services::game_service::GameService;
use quizladder_engine::services::question_repository::InMemoryQuestionRepository;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizladder_engine=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// `per_level` questions for each of the 15 levels; answer index 0 is right.
pub fn generate_questions(per_level: usize) -> Vec<QuestionTemplate> {
    (0..15)
        .flat_map(|level| {
            (0..per_level).map(move |variant| QuestionTemplate {
                id: format!("q-{}-{}", level, variant),
                level,
                text: format!("Question {} of level {}", variant, level),
                answers: [
                    format!("right {}-{}", level, variant),
                    "wrong one".to_string(),
                    "wrong two".to_string(),
                    "wrong three".to_string(),
                ],
                correct_index: 0,
            })
        })
        .collect()
}

pub struct TestApp {
    pub games: GameService,
    pub ledger: Arc<InMemoryBalanceLedger>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_rules(LadderRules::default())
}

pub fn create_test_app_with_rules(rules: LadderRules) -> TestApp {
    init_tracing();

    let repository = Arc::new(InMemoryQuestionRepository::with_seed(
        generate_questions(4),
        7,
    ));
    let ledger = Arc::new(InMemoryBalanceLedger::new());
    let games = GameService::new(repository, ledger.clone(), rules, Some(42));

    TestApp { games, ledger }
}

/// Service with default rules over a caller-supplied ledger.
pub fn create_game_service(ledger: Arc<dyn BalanceLedger>) -> GameService {
    init_tracing();

    let repository = Arc::new(InMemoryQuestionRepository::with_seed(
        generate_questions(4),
        7,
    ));
    GameService::new(repository, ledger, LadderRules::default(), Some(42))
}
