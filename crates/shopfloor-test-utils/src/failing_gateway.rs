// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway with switchable failures for error-path tests.
//!
//! `FailingGateway` delegates to a [`MemoryGateway`] until told to fail.
//! Reads and writes are switched independently, and every call is counted.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use shopfloor_core::{
    DatasetKey, HealthStatus, PersistenceGateway, PluginAdapter, Record, ShopfloorError,
    StorageSlot,
};
use shopfloor_storage::MemoryGateway;

/// A persistence gateway whose calls can be made to fail on demand.
#[derive(Default)]
pub struct FailingGateway {
    inner: MemoryGateway,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl FailingGateway {
    /// Create a gateway that succeeds until told otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing in-memory gateway, for seeding and inspection.
    pub fn inner(&self) -> &MemoryGateway {
        &self.inner
    }

    /// Make every subsequent read fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of read calls seen, including failed ones.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write calls seen, including failed ones.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<(), ShopfloorError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ShopfloorError::storage("injected read failure"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), ShopfloorError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ShopfloorError::storage("injected write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for FailingGateway {
    fn name(&self) -> &str {
        "failing"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ShopfloorError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("reads failing".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ShopfloorError> {
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for FailingGateway {
    async fn read_slot_config(&self) -> Result<Vec<StorageSlot>, ShopfloorError> {
        self.check_read()?;
        self.inner.read_slot_config().await
    }

    async fn write_slot_config(&self, slots: &[StorageSlot]) -> Result<(), ShopfloorError> {
        self.check_write()?;
        self.inner.write_slot_config(slots).await
    }

    async fn read_dataset(&self, key: &DatasetKey) -> Result<Vec<Record>, ShopfloorError> {
        self.check_read()?;
        self.inner.read_dataset(key).await
    }

    async fn append_or_upsert(
        &self,
        key: &DatasetKey,
        record: Record,
    ) -> Result<(), ShopfloorError> {
        self.check_write()?;
        self.inner.append_or_upsert(key, record).await
    }

    async fn delete_record(
        &self,
        key: &DatasetKey,
        record_id: &str,
    ) -> Result<bool, ShopfloorError> {
        self.check_write()?;
        self.inner.delete_record(key, record_id).await
    }
}
