use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Account store that receives the final prize of a game.
#[async_trait]
pub trait BalanceLedger: Send + Sync {
    async fn credit(&self, user_id: &str, amount: u64) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryBalanceLedger {
    balances: RwLock<HashMap<String, u64>>,
}

impl InMemoryBalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn balance(&self, user_id: &str) -> u64 {
        self.balances
            .read()
            .await
            .get(user_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl BalanceLedger for InMemoryBalanceLedger {
    async fn credit(&self, user_id: &str, amount: u64) -> Result<()> {
        let mut balances = self.balances.write().await;
        let balance = balances.entry(user_id.to_string()).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("Balance overflow for user {}", user_id))?;

        tracing::info!(
            "Credited {} to user {} (balance={})",
            amount,
            user_id,
            *balance
        );
        Ok(())
    }
}
