// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage slot model.
//!
//! A slot stands in for one remote spreadsheet + folder pair. Each slot keeps
//! its own byte ledger; capacity thresholds are applied by `shopfloor-capacity`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One gibibyte.
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Default hard limit: no write is accepted once a slot reaches it.
pub const DEFAULT_HARD_LIMIT_BYTES: u64 = 15 * GIB;

/// Default safe limit: new documents are only placed below it.
pub const DEFAULT_SAFE_LIMIT_BYTES: u64 = 11 * GIB;

/// Integer identity of a storage slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Configured and initialized, no accounted writes yet.
    #[default]
    Ready,
    /// Receiving writes.
    Active,
    /// At or past the hard limit.
    Full,
    /// Misconfigured or unreachable.
    Error,
}

/// A configured storage destination with its capacity ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSlot {
    pub id: SlotId,
    pub name: String,
    /// Remote folder locator (drive folder id or path).
    #[serde(default)]
    pub folder_locator: Option<String>,
    /// Remote logical dataset locator (spreadsheet id).
    #[serde(default)]
    pub dataset_locator: Option<String>,
    /// Hard capacity of the slot.
    pub total_capacity_bytes: u64,
    #[serde(default)]
    pub used_bytes: u64,
    /// Credentials and locators are present.
    #[serde(default)]
    pub is_connected: bool,
    /// The logical dataset has been created.
    #[serde(default)]
    pub is_initialized: bool,
    #[serde(default)]
    pub status: SlotStatus,
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    /// Account that owns the remote storage.
    #[serde(default)]
    pub owner_account: Option<String>,
}

impl StorageSlot {
    /// A fresh, unconnected slot with the given capacity.
    pub fn new(id: SlotId, total_capacity_bytes: u64) -> Self {
        Self {
            id,
            name: format!("Slot {id}"),
            folder_locator: None,
            dataset_locator: None,
            total_capacity_bytes,
            used_bytes: 0,
            is_connected: false,
            is_initialized: false,
            status: SlotStatus::Ready,
            last_sync: None,
            owner_account: None,
        }
    }

    /// Bytes left before the hard limit.
    pub fn remaining_bytes(&self) -> u64 {
        self.total_capacity_bytes.saturating_sub(self.used_bytes)
    }

    /// Whether usage has reached the hard limit.
    pub fn is_full(&self) -> bool {
        self.used_bytes >= self.total_capacity_bytes
    }

    /// Fraction of the hard limit in use, for reporting.
    pub fn utilization(&self) -> f64 {
        if self.total_capacity_bytes == 0 {
            return 1.0;
        }
        self.used_bytes as f64 / self.total_capacity_bytes as f64
    }
}
