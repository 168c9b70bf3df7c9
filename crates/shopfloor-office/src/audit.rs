// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Action and login audit logs.
//!
//! Each category is its own dataset. Entries are read newest first and each
//! log keeps at most `retention` entries; the oldest are evicted on append.

use std::sync::Arc;

use chrono::Utc;
use shopfloor_core::{
    AuditCategory, AuditEntry, DatasetKey, PersistenceGateway, Record, ShopfloorError,
};
use tracing::{debug, warn};

/// Append-only, capped audit logs over the persistence gateway.
pub struct AuditLog {
    gateway: Arc<dyn PersistenceGateway>,
    retention: usize,
}

impl AuditLog {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, retention: usize) -> Self {
        Self {
            gateway,
            retention: retention.max(1),
        }
    }

    /// Record an action in a category log.
    pub async fn record(
        &self,
        category: AuditCategory,
        actor: &str,
        action: &str,
        detail: impl Into<String>,
    ) -> Result<AuditEntry, ShopfloorError> {
        self.append(DatasetKey::Audit(category), actor, action, detail.into())
            .await
    }

    /// Record a login.
    pub async fn record_login(&self, actor: &str) -> Result<AuditEntry, ShopfloorError> {
        self.append(DatasetKey::LoginAudit, actor, "login", String::new())
            .await
    }

    /// Entries of a category log, newest first.
    pub async fn entries(
        &self,
        category: AuditCategory,
    ) -> Result<Vec<AuditEntry>, ShopfloorError> {
        self.read(&DatasetKey::Audit(category)).await
    }

    /// Login entries, newest first.
    pub async fn logins(&self) -> Result<Vec<AuditEntry>, ShopfloorError> {
        self.read(&DatasetKey::LoginAudit).await
    }

    async fn read(&self, key: &DatasetKey) -> Result<Vec<AuditEntry>, ShopfloorError> {
        let records = self.gateway.read_dataset(key).await?;
        let mut entries: Vec<AuditEntry> = records
            .iter()
            .filter_map(|record| match record.decode::<AuditEntry>() {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(
                        key = %key,
                        record_id = %record.id,
                        error = %e,
                        "skipping malformed audit entry"
                    );
                    None
                }
            })
            .collect();
        // Stored oldest first; a stable reverse keeps same-instant entries in order.
        entries.reverse();
        entries.sort_by(|a, b| b.at.cmp(&a.at));
        Ok(entries)
    }

    async fn append(
        &self,
        key: DatasetKey,
        actor: &str,
        action: &str,
        detail: String,
    ) -> Result<AuditEntry, ShopfloorError> {
        let entry = AuditEntry {
            id: uuid::Uuid::new_v4().to_string(),
            actor: actor.to_string(),
            action: action.to_string(),
            detail,
            at: Utc::now(),
        };
        let record = Record::encode(&entry.id, &entry).map_err(ShopfloorError::storage)?;
        self.gateway.append_or_upsert(&key, record).await?;

        let entries = self.read(&key).await?;
        for stale in entries.iter().skip(self.retention) {
            self.gateway.delete_record(&key, &stale.id).await?;
        }
        debug!(key = %key, actor, action, "audit entry recorded");
        Ok(entry)
    }
}
