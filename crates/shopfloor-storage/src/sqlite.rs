// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the PersistenceGateway trait.

use async_trait::async_trait;
use tracing::debug;

use shopfloor_config::model::StorageConfig;
use shopfloor_core::{
    DatasetKey, HealthStatus, PersistenceGateway, PluginAdapter, Record, ShopfloorError,
    StorageSlot,
};

use crate::codec::{self, SLOT_CONFIG_KEY};
use crate::database::{map_tr_err, Database};
use crate::queries::kv;

/// SQLite-backed persistence gateway.
///
/// Each dataset lives as one JSON array in the `kv_store` table. Upserts and
/// deletes are read-modify-write inside a single transaction.
pub struct SqliteGateway {
    db: Database,
}

impl SqliteGateway {
    /// Open the database named by the storage config and run migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, ShopfloorError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        Ok(Self { db })
    }

    /// Private in-memory database, for tests and dry runs.
    pub async fn open_in_memory() -> Result<Self, ShopfloorError> {
        let db = Database::open(":memory:", false).await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl PluginAdapter for SqliteGateway {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ShopfloorError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ShopfloorError> {
        self.db.checkpoint().await
    }
}

#[async_trait]
impl PersistenceGateway for SqliteGateway {
    async fn read_slot_config(&self) -> Result<Vec<StorageSlot>, ShopfloorError> {
        let raw = kv::get(&self.db, SLOT_CONFIG_KEY).await?;
        Ok(codec::decode_collection(SLOT_CONFIG_KEY, raw.as_deref()))
    }

    async fn write_slot_config(&self, slots: &[StorageSlot]) -> Result<(), ShopfloorError> {
        let raw = codec::encode_collection(slots)?;
        kv::put(&self.db, SLOT_CONFIG_KEY, raw).await?;
        debug!(count = slots.len(), "slot config written");
        Ok(())
    }

    async fn read_dataset(&self, key: &DatasetKey) -> Result<Vec<Record>, ShopfloorError> {
        let storage_key = key.storage_key();
        let raw = kv::get(&self.db, &storage_key).await?;
        Ok(codec::decode_collection(&storage_key, raw.as_deref()))
    }

    async fn append_or_upsert(
        &self,
        key: &DatasetKey,
        record: Record,
    ) -> Result<(), ShopfloorError> {
        let storage_key = key.storage_key();
        let decode_key = storage_key.clone();
        kv::update(&self.db, &storage_key, move |raw| {
            let mut records: Vec<Record> = codec::decode_collection(&decode_key, raw.as_deref());
            codec::upsert(&mut records, record);
            Ok((Some(codec::encode_collection(&records)?), ()))
        })
        .await
    }

    async fn delete_record(
        &self,
        key: &DatasetKey,
        record_id: &str,
    ) -> Result<bool, ShopfloorError> {
        let storage_key = key.storage_key();
        let decode_key = storage_key.clone();
        let record_id = record_id.to_string();
        kv::update(&self.db, &storage_key, move |raw| {
            let mut records: Vec<Record> = codec::decode_collection(&decode_key, raw.as_deref());
            if !codec::remove(&mut records, &record_id) {
                return Ok((None, false));
            }
            Ok((Some(codec::encode_collection(&records)?), true))
        })
        .await
    }
}
