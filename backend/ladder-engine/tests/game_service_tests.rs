mod common;

use std::time::Duration;

use quizladder_engine::models::{
    AnswerOutcome, Game, GameStatus, HelpPayload, LadderRules, Lifeline, Slot,
};
use quizladder_engine::services::prize_table::PrizeTable;
use quizladder_engine::{GameError, ServiceError};
use uuid::Uuid;

fn correct_label(game: &Game) -> String {
    game.current_question()
        .expect("game has a current question")
        .correct_slot()
        .to_string()
}

fn wrong_label(game: &Game) -> String {
    let correct = game.current_question().unwrap().correct_slot();
    Slot::ALL
        .into_iter()
        .find(|slot| *slot != correct)
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_create_game() {
    let app = common::create_test_app();

    let game = app.games.create_game("user-1").await.unwrap();

    assert_eq!(game.user_id, "user-1");
    assert_eq!(game.status, GameStatus::InProgress);
    assert!(!game.is_finished());
    assert_eq!(game.questions.len(), 15);
    assert_eq!(
        game.questions.iter().map(|q| q.level()).collect::<Vec<_>>(),
        (0..15).collect::<Vec<_>>()
    );
    assert_eq!(app.games.active_game_id("user-1").await, Some(game.id));
}

#[tokio::test]
async fn test_second_game_is_rejected() {
    let app = common::create_test_app();
    let first = app.games.create_game("user-1").await.unwrap();

    let err = app.games.create_game("user-1").await.unwrap_err();

    assert!(matches!(err, ServiceError::ActiveGameExists(id) if id == first.id));
    assert_eq!(app.games.count_by_status(GameStatus::InProgress).await, 1);
}

#[tokio::test]
async fn test_other_users_game_is_denied() {
    let app = common::create_test_app();
    let alien_game = app.games.create_game("alien").await.unwrap();

    let err = app.games.get_game("user-1", alien_game.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied));

    let err = app
        .games
        .answer("user-1", alien_game.id, "a")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied));

    let untouched = app.games.get_game("alien", alien_game.id).await.unwrap();
    assert_eq!(untouched, alien_game);
}

#[tokio::test]
async fn test_unknown_game() {
    let app = common::create_test_app();
    let missing = Uuid::new_v4();

    let err = app.games.take_money("user-1", missing).await.unwrap_err();

    assert!(matches!(err, ServiceError::GameNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_correct_answer_continues_game() {
    let app = common::create_test_app();
    let game = app.games.create_game("user-1").await.unwrap();

    let outcome = app
        .games
        .answer("user-1", game.id, &correct_label(&game))
        .await
        .unwrap();

    assert_eq!(outcome, AnswerOutcome::Advanced { level: 1 });
    let game = app.games.get_game("user-1", game.id).await.unwrap();
    assert!(!game.is_finished());
    assert!(game.current_level > 0);
}

#[tokio::test]
async fn test_wrong_answer_finishes_game_without_prize() {
    let app = common::create_test_app();
    let game = app.games.create_game("user-1").await.unwrap();

    let outcome = app
        .games
        .answer("user-1", game.id, &wrong_label(&game))
        .await
        .unwrap();

    assert!(!outcome.is_success());
    let game = app.games.get_game("user-1", game.id).await.unwrap();
    assert_eq!(game.status, GameStatus::Fail);
    assert_eq!(game.prize, 0);
    assert_eq!(app.ledger.balance("user-1").await, 0);
    assert_eq!(app.games.active_game_id("user-1").await, None);
}

#[tokio::test]
async fn test_take_money_credits_balance() {
    let app = common::create_test_app();
    let mut game = app.games.create_game("user-1").await.unwrap();
    for _ in 0..2 {
        app.games
            .answer("user-1", game.id, &correct_label(&game))
            .await
            .unwrap();
        game = app.games.get_game("user-1", game.id).await.unwrap();
    }
    assert_eq!(game.current_level, 2);

    let game = app.games.take_money("user-1", game.id).await.unwrap();

    assert_eq!(game.status, GameStatus::Money);
    assert_eq!(game.prize, 200);
    assert_eq!(app.ledger.balance("user-1").await, 200);
}

#[tokio::test]
async fn test_full_ladder_wins_top_prize() {
    let app = common::create_test_app();
    let mut game = app.games.create_game("user-1").await.unwrap();

    for level in 0..15 {
        let outcome = app
            .games
            .answer("user-1", game.id, &correct_label(&game))
            .await
            .unwrap();
        if level < 14 {
            assert_eq!(outcome, AnswerOutcome::Advanced { level: level + 1 });
        } else {
            assert_eq!(outcome, AnswerOutcome::Won { prize: 1_000_000 });
        }
        game = app.games.get_game("user-1", game.id).await.unwrap();
    }

    assert_eq!(game.status, GameStatus::Won);
    assert_eq!(game.current_level, 15);
    assert_eq!(game.prize, 1_000_000);
    assert_eq!(app.ledger.balance("user-1").await, 1_000_000);

    // A finished game frees the user for a new one.
    let next = app.games.create_game("user-1").await.unwrap();
    assert_ne!(next.id, game.id);
}

#[tokio::test]
async fn test_finished_game_rejects_answers() {
    let app = common::create_test_app();
    let game = app.games.create_game("user-1").await.unwrap();
    app.games.take_money("user-1", game.id).await.unwrap();

    let err = app.games.answer("user-1", game.id, "a").await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Game(GameError::GameAlreadyFinished)
    ));
    let game = app.games.get_game("user-1", game.id).await.unwrap();
    assert_eq!(game.current_level, 0);
    assert_eq!(game.prize, 0);
}

#[tokio::test]
async fn test_audience_help() {
    let app = common::create_test_app();
    let game = app.games.create_game("user-1").await.unwrap();
    assert!(game
        .current_question()
        .unwrap()
        .help(Lifeline::AudienceHelp)
        .is_none());
    assert!(!game.is_lifeline_used(Lifeline::AudienceHelp));

    let payload = app
        .games
        .use_help("user-1", game.id, Lifeline::AudienceHelp)
        .await
        .unwrap();

    let HelpPayload::AudienceHelp { distribution } = payload else {
        panic!("expected audience help, got {:?}", payload);
    };
    assert_eq!(
        distribution.keys().copied().collect::<Vec<_>>(),
        Slot::ALL.to_vec()
    );

    let game = app.games.get_game("user-1", game.id).await.unwrap();
    assert!(!game.is_finished());
    assert!(game.is_lifeline_used(Lifeline::AudienceHelp));
    assert!(game
        .current_question()
        .unwrap()
        .help(Lifeline::AudienceHelp)
        .is_some());
}

#[tokio::test]
async fn test_lifeline_cannot_be_reused() {
    let app = common::create_test_app();
    let game = app.games.create_game("user-1").await.unwrap();
    app.games
        .use_help("user-1", game.id, Lifeline::FiftyFifty)
        .await
        .unwrap();

    let err = app
        .games
        .use_help("user-1", game.id, Lifeline::FiftyFifty)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Game(GameError::LifelineAlreadyUsed(Lifeline::FiftyFifty))
    ));
    let game = app.games.get_game("user-1", game.id).await.unwrap();
    assert_eq!(game.used_lifelines.len(), 1);
}

#[tokio::test]
async fn test_timeout_pays_fireproof_prize() {
    let rules = LadderRules::new(PrizeTable::default(), 1, 0.8).unwrap();
    let app = common::create_test_app_with_rules(rules);
    let mut game = app.games.create_game("user-1").await.unwrap();
    for _ in 0..5 {
        app.games
            .answer("user-1", game.id, &correct_label(&game))
            .await
            .unwrap();
        game = app.games.get_game("user-1", game.id).await.unwrap();
    }
    assert_eq!(game.current_level, 5);

    tokio::time::sleep(Duration::from_millis(1_200)).await;
    let outcome = app
        .games
        .answer("user-1", game.id, &correct_label(&game))
        .await
        .unwrap();

    assert_eq!(outcome, AnswerOutcome::TimedOut { prize: 1_000 });
    let game = app.games.get_game("user-1", game.id).await.unwrap();
    assert_eq!(game.status, GameStatus::Timeout);
    assert_eq!(game.current_level, 5);
    assert_eq!(app.ledger.balance("user-1").await, 1_000);
}
