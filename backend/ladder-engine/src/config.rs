use serde::Deserialize;
use std::env;

use crate::error::GameError;
use crate::models::game::{LadderRules, DEFAULT_FRIEND_CALL_ACCURACY, DEFAULT_TIME_LIMIT_SECONDS};
use crate::services::prize_table::{PrizeTable, DEFAULT_FIREPROOF_LEVELS, DEFAULT_PRIZES};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub time_limit_seconds: i64,
    pub friend_call_accuracy: f64,
    pub prizes: Vec<u64>,
    pub fireproof_levels: Vec<usize>,
    /// Fixed seed for shuffles and lifelines; random when unset.
    pub rng_seed: Option<u64>,
    /// JSON file with question templates for the in-memory repository.
    pub question_bank_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            friend_call_accuracy: DEFAULT_FRIEND_CALL_ACCURACY,
            prizes: DEFAULT_PRIZES.to_vec(),
            fireproof_levels: DEFAULT_FIREPROOF_LEVELS.to_vec(),
            rng_seed: None,
            question_bank_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Local .env is optional
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_, e.g. APP__GAME__TIME_LIMIT_SECONDS)
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("game.prizes")
                    .with_list_parse_key("game.fireproof_levels"),
            )
            .build()?;

        let defaults = Config::default();

        let config = Config {
            time_limit_seconds: get_or(
                &settings,
                "game.time_limit_seconds",
                defaults.time_limit_seconds,
            )?,
            friend_call_accuracy: get_or(
                &settings,
                "game.friend_call_accuracy",
                defaults.friend_call_accuracy,
            )?,
            prizes: get_or(&settings, "game.prizes", defaults.prizes)?,
            fireproof_levels: get_or(&settings, "game.fireproof_levels", defaults.fireproof_levels)?,
            rng_seed: get_or(&settings, "game.rng_seed", None)?,
            question_bank_path: get_or(&settings, "questions.bank_path", None)?,
        };

        tracing::info!(
            "Configuration loaded for environment {}: {} levels, time limit {}s",
            env,
            config.prizes.len(),
            config.time_limit_seconds
        );

        Ok(config)
    }

    /// Validated rules for new games.
    pub fn ladder_rules(&self) -> Result<LadderRules, GameError> {
        let prize_table =
            PrizeTable::new(self.prizes.clone(), self.fireproof_levels.iter().copied())?;
        LadderRules::new(
            prize_table,
            self.time_limit_seconds,
            self.friend_call_accuracy,
        )
    }
}

fn get_or<T>(settings: &config::Config, key: &str, default: T) -> Result<T, config::ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    match settings.get::<T>(key) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => Ok(default),
        Err(e) => Err(e),
    }
}
