// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway decorator that bounds every call by a deadline.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use shopfloor_core::{
    DatasetKey, HealthStatus, PersistenceGateway, PluginAdapter, Record, ShopfloorError,
    StorageSlot,
};

/// Wraps a gateway so no call waits longer than `limit`.
///
/// Expiry surfaces as [`ShopfloorError::Timeout`], which callers treat as a
/// transient failure.
pub struct TimeoutGateway<G> {
    inner: G,
    limit: Duration,
}

impl<G: PersistenceGateway> TimeoutGateway<G> {
    pub fn new(inner: G, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T, ShopfloorError>>,
    ) -> Result<T, ShopfloorError> {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, limit_ms = self.limit.as_millis() as u64, "gateway call timed out");
                Err(ShopfloorError::Timeout {
                    duration: self.limit,
                })
            }
        }
    }
}

#[async_trait]
impl<G: PersistenceGateway> PluginAdapter for TimeoutGateway<G> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn version(&self) -> semver::Version {
        self.inner.version()
    }

    async fn health_check(&self) -> Result<HealthStatus, ShopfloorError> {
        self.bounded("health_check", self.inner.health_check()).await
    }

    async fn shutdown(&self) -> Result<(), ShopfloorError> {
        self.bounded("shutdown", self.inner.shutdown()).await
    }
}

#[async_trait]
impl<G: PersistenceGateway> PersistenceGateway for TimeoutGateway<G> {
    async fn read_slot_config(&self) -> Result<Vec<StorageSlot>, ShopfloorError> {
        self.bounded("read_slot_config", self.inner.read_slot_config())
            .await
    }

    async fn write_slot_config(&self, slots: &[StorageSlot]) -> Result<(), ShopfloorError> {
        self.bounded("write_slot_config", self.inner.write_slot_config(slots))
            .await
    }

    async fn read_dataset(&self, key: &DatasetKey) -> Result<Vec<Record>, ShopfloorError> {
        self.bounded("read_dataset", self.inner.read_dataset(key))
            .await
    }

    async fn append_or_upsert(
        &self,
        key: &DatasetKey,
        record: Record,
    ) -> Result<(), ShopfloorError> {
        self.bounded("append_or_upsert", self.inner.append_or_upsert(key, record))
            .await
    }

    async fn delete_record(
        &self,
        key: &DatasetKey,
        record_id: &str,
    ) -> Result<bool, ShopfloorError> {
        self.bounded("delete_record", self.inner.delete_record(key, record_id))
            .await
    }
}
