//! Single-player quiz ladder: a fixed sequence of increasingly valuable
//! questions, three one-shot lifelines and a fireproof prize floor.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{GameError, ServiceError};
pub use services::AppState;
