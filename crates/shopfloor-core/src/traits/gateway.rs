// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence gateway trait: durable key-value access per slot.

use async_trait::async_trait;

use crate::error::ShopfloorError;
use crate::slot::StorageSlot;
use crate::traits::adapter::PluginAdapter;
use crate::types::{DatasetKey, Record};

/// Durable storage behind the office core.
///
/// Stands in for a remote spreadsheet/drive backend. Each call is atomic on
/// its own: it fully succeeds or fully fails. Calls from one caller are not
/// reordered. There is no record-level locking; concurrent writers to the
/// same record are last-write-wins.
#[async_trait]
pub trait PersistenceGateway: PluginAdapter {
    /// Read the slot configuration record. Empty if never written.
    async fn read_slot_config(&self) -> Result<Vec<StorageSlot>, ShopfloorError>;

    /// Replace the slot configuration record.
    async fn write_slot_config(&self, slots: &[StorageSlot]) -> Result<(), ShopfloorError>;

    /// Read every record of a dataset in insertion order.
    ///
    /// A dataset that cannot be parsed reads as empty.
    async fn read_dataset(&self, key: &DatasetKey) -> Result<Vec<Record>, ShopfloorError>;

    /// Replace the record with the same id in place, or append it.
    async fn append_or_upsert(&self, key: &DatasetKey, record: Record)
        -> Result<(), ShopfloorError>;

    /// Delete a record by id. Returns whether a record was removed.
    async fn delete_record(&self, key: &DatasetKey, record_id: &str)
        -> Result<bool, ShopfloorError>;
}
