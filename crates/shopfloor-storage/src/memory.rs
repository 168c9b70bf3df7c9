// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence gateway.
//!
//! Holds the same JSON encoding as the SQLite backend so malformed-data
//! handling behaves identically. Backs the unit and integration tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use shopfloor_core::{
    DatasetKey, HealthStatus, PersistenceGateway, PluginAdapter, Record, ShopfloorError,
    StorageSlot,
};

use crate::codec::{self, SLOT_CONFIG_KEY};

/// Gateway backed by a map of raw JSON values.
#[derive(Default)]
pub struct MemoryGateway {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the raw value under a dataset key, bypassing encoding.
    pub async fn put_raw(&self, key: &DatasetKey, raw: impl Into<String>) {
        self.values.lock().await.insert(key.storage_key(), raw.into());
    }

    /// The raw value under a dataset key, if any.
    pub async fn get_raw(&self, key: &DatasetKey) -> Option<String> {
        self.values.lock().await.get(&key.storage_key()).cloned()
    }
}

#[async_trait]
impl PluginAdapter for MemoryGateway {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ShopfloorError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ShopfloorError> {
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn read_slot_config(&self) -> Result<Vec<StorageSlot>, ShopfloorError> {
        let values = self.values.lock().await;
        Ok(codec::decode_collection(
            SLOT_CONFIG_KEY,
            values.get(SLOT_CONFIG_KEY).map(String::as_str),
        ))
    }

    async fn write_slot_config(&self, slots: &[StorageSlot]) -> Result<(), ShopfloorError> {
        let raw = codec::encode_collection(slots)?;
        self.values
            .lock()
            .await
            .insert(SLOT_CONFIG_KEY.to_string(), raw);
        Ok(())
    }

    async fn read_dataset(&self, key: &DatasetKey) -> Result<Vec<Record>, ShopfloorError> {
        let storage_key = key.storage_key();
        let values = self.values.lock().await;
        Ok(codec::decode_collection(
            &storage_key,
            values.get(&storage_key).map(String::as_str),
        ))
    }

    async fn append_or_upsert(
        &self,
        key: &DatasetKey,
        record: Record,
    ) -> Result<(), ShopfloorError> {
        let storage_key = key.storage_key();
        let mut values = self.values.lock().await;
        let mut records: Vec<Record> =
            codec::decode_collection(&storage_key, values.get(&storage_key).map(String::as_str));
        codec::upsert(&mut records, record);
        values.insert(storage_key, codec::encode_collection(&records)?);
        Ok(())
    }

    async fn delete_record(
        &self,
        key: &DatasetKey,
        record_id: &str,
    ) -> Result<bool, ShopfloorError> {
        let storage_key = key.storage_key();
        let mut values = self.values.lock().await;
        let mut records: Vec<Record> =
            codec::decode_collection(&storage_key, values.get(&storage_key).map(String::as_str));
        if !codec::remove(&mut records, record_id) {
            return Ok(false);
        }
        values.insert(storage_key, codec::encode_collection(&records)?);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shopfloor_core::{DatasetKind, SlotId};

    fn record(id: &str) -> Record {
        Record::encode(id, &json!({ "text": id })).unwrap()
    }

    #[tokio::test]
    async fn datasets_are_isolated_by_key() {
        let gw = MemoryGateway::new();
        let chat1 = DatasetKey::slot(SlotId(1), DatasetKind::ChatLog);
        let chat2 = DatasetKey::slot(SlotId(2), DatasetKind::ChatLog);
        gw.append_or_upsert(&chat1, record("m1")).await.unwrap();
        assert_eq!(gw.read_dataset(&chat1).await.unwrap().len(), 1);
        assert!(gw.read_dataset(&chat2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_raw_reads_empty_and_is_replaced_on_write() {
        let gw = MemoryGateway::new();
        gw.put_raw(&DatasetKey::Documents, "<<garbage>>").await;
        assert!(gw.read_dataset(&DatasetKey::Documents).await.unwrap().is_empty());
        gw.append_or_upsert(&DatasetKey::Documents, record("d1"))
            .await
            .unwrap();
        let records = gw.read_dataset(&DatasetKey::Documents).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_leaves_value_untouched() {
        let gw = MemoryGateway::new();
        assert!(!gw.delete_record(&DatasetKey::Presence, "x").await.unwrap());
        assert_eq!(gw.get_raw(&DatasetKey::Presence).await, None);
    }
}
