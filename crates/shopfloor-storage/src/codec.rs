// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON codec shared by the key-value backends.
//!
//! Every dataset is one JSON array under one key. A value that fails to parse
//! is treated as an empty collection and logged; it never fails the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use shopfloor_core::{Record, ShopfloorError};
use tracing::warn;

/// Key of the slot configuration record.
pub const SLOT_CONFIG_KEY: &str = "slots";

/// Decode a stored collection, falling back to empty on absent or malformed input.
pub fn decode_collection<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(key, error = %e, "malformed dataset, treating as empty");
            Vec::new()
        }
    }
}

/// Encode a collection for storage.
pub fn encode_collection<T: Serialize>(items: &[T]) -> Result<String, ShopfloorError> {
    serde_json::to_string(items).map_err(ShopfloorError::storage)
}

/// Replace the record with the same id in place, or append it.
pub fn upsert(records: &mut Vec<Record>, record: Record) {
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

/// Remove a record by id, returning whether one was removed.
pub fn remove(records: &mut Vec<Record>, record_id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.id != record_id);
    records.len() != before
}
