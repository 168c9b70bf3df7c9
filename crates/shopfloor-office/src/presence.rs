// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presence heartbeat: user id to last-seen epoch millis.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shopfloor_core::{DatasetKey, PersistenceGateway, PresenceBeat, Record, ShopfloorError};
use tokio::sync::Mutex;
use tracing::debug;

use crate::poller::PollTask;

/// Writes this session's heartbeat and reports who else is online.
pub struct PresenceTracker {
    gateway: Arc<dyn PersistenceGateway>,
    user_id: String,
    timeout: Duration,
    online: Mutex<Vec<String>>,
}

impl PresenceTracker {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        user_id: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            user_id: user_id.into(),
            timeout,
            online: Mutex::new(Vec::new()),
        }
    }

    /// Record that this session was alive at `now_ms`.
    pub async fn beat(&self, now_ms: i64) -> Result<(), ShopfloorError> {
        let beat = PresenceBeat { last_seen_ms: now_ms };
        let record = Record::encode(&self.user_id, &beat).map_err(ShopfloorError::storage)?;
        self.gateway.append_or_upsert(&DatasetKey::Presence, record).await
    }

    /// Users seen within the timeout of `now_ms`, sorted by id.
    pub async fn online_users(&self, now_ms: i64) -> Result<Vec<String>, ShopfloorError> {
        let window = i64::try_from(self.timeout.as_millis()).unwrap_or(i64::MAX);
        let records = self.gateway.read_dataset(&DatasetKey::Presence).await?;
        let mut online: Vec<String> = records
            .iter()
            .filter_map(|r| r.decode::<PresenceBeat>().ok().map(|b| (r.id.clone(), b)))
            .filter(|(_, beat)| now_ms.saturating_sub(beat.last_seen_ms) <= window)
            .map(|(id, _)| id)
            .collect();
        online.sort();
        Ok(online)
    }

    /// Result of the most recent successful cycle.
    pub async fn last_online(&self) -> Vec<String> {
        self.online.lock().await.clone()
    }
}

#[async_trait]
impl PollTask for PresenceTracker {
    fn name(&self) -> &str {
        "presence"
    }

    async fn run_cycle(&self) -> Result<(), ShopfloorError> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.beat(now_ms).await?;
        let online = self.online_users(now_ms).await?;
        debug!(online = online.len(), "presence refreshed");
        *self.online.lock().await = online;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfloor_storage::MemoryGateway;

    #[tokio::test]
    async fn stale_users_drop_out() {
        let gw: Arc<dyn PersistenceGateway> = Arc::new(MemoryGateway::new());
        let lan = PresenceTracker::new(gw.clone(), "lan", Duration::from_secs(15));
        let minh = PresenceTracker::new(gw.clone(), "minh", Duration::from_secs(15));

        minh.beat(1_000).await.unwrap();
        lan.beat(20_000).await.unwrap();
        assert_eq!(lan.online_users(20_000).await.unwrap(), vec!["lan"]);

        minh.beat(19_000).await.unwrap();
        assert_eq!(lan.online_users(20_000).await.unwrap(), vec!["lan", "minh"]);
    }

    #[tokio::test]
    async fn beat_overwrites_own_entry() {
        let gw: Arc<dyn PersistenceGateway> = Arc::new(MemoryGateway::new());
        let lan = PresenceTracker::new(gw.clone(), "lan", Duration::from_secs(15));
        lan.beat(1).await.unwrap();
        lan.beat(2).await.unwrap();
        assert_eq!(gw.read_dataset(&DatasetKey::Presence).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cycle_publishes_self_as_online() {
        let gw: Arc<dyn PersistenceGateway> = Arc::new(MemoryGateway::new());
        let lan = PresenceTracker::new(gw, "lan", Duration::from_secs(15));
        lan.run_cycle().await.unwrap();
        assert_eq!(lan.last_online().await, vec!["lan"]);
    }
}
