use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter,
    IntCounterVec, IntGauge, TextEncoder,
};

use crate::models::game::GameStatus;
use crate::models::lifeline::Lifeline;

lazy_static! {
    pub static ref GAMES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quizladder_games_total",
        "Total number of games by status (created or final status)",
        &["status"]
    )
    .unwrap();

    pub static ref GAMES_ACTIVE: IntGauge = register_int_gauge!(
        "quizladder_games_active",
        "Number of games currently in progress"
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quizladder_answers_submitted_total",
        "Total number of answers submitted",
        &["correct"]
    )
    .unwrap();

    pub static ref LIFELINES_USED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quizladder_lifelines_used_total",
        "Total number of lifelines played",
        &["lifeline"]
    )
    .unwrap();

    pub static ref PRIZES_PAID_TOTAL: IntCounter = register_int_counter!(
        "quizladder_prizes_paid_total",
        "Sum of all prizes credited to players"
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

pub fn record_game_created() {
    GAMES_TOTAL.with_label_values(&["created"]).inc();
    GAMES_ACTIVE.inc();
}

pub fn record_game_finished(status: GameStatus, prize: u64) {
    GAMES_TOTAL.with_label_values(&[status.as_str()]).inc();
    GAMES_ACTIVE.dec();
    PRIZES_PAID_TOTAL.inc_by(prize);
}

pub fn record_answer(correct: bool) {
    let label = if correct { "true" } else { "false" };
    ANSWERS_SUBMITTED_TOTAL.with_label_values(&[label]).inc();
}

pub fn record_lifeline(lifeline: Lifeline) {
    LIFELINES_USED_TOTAL
        .with_label_values(&[lifeline.as_str()])
        .inc();
}
