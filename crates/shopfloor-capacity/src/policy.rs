// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safe and hard capacity thresholds.
//!
//! The hard limit of a slot is its own `total_capacity_bytes`. The safe limit
//! is the configured safe threshold, clamped to the slot's capacity. Between
//! the two lies the buffer zone: documents already anchored to the slot keep
//! writing, new documents go elsewhere.

use shopfloor_config::model::CapacityConfig;
use shopfloor_core::StorageSlot;

/// Threshold policy applied to every slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPolicy {
    safe_limit_bytes: u64,
    default_capacity_bytes: u64,
}

impl CapacityPolicy {
    pub fn new(safe_limit_bytes: u64, default_capacity_bytes: u64) -> Self {
        Self {
            safe_limit_bytes,
            default_capacity_bytes,
        }
    }

    pub fn from_config(config: &CapacityConfig) -> Self {
        Self::new(config.safe_limit_bytes, config.hard_limit_bytes)
    }

    /// Capacity given to newly configured slots.
    pub fn default_capacity_bytes(&self) -> u64 {
        self.default_capacity_bytes
    }

    /// Usage below which `slot` may receive new documents.
    pub fn safe_limit_for(&self, slot: &StorageSlot) -> u64 {
        self.safe_limit_bytes.min(slot.total_capacity_bytes)
    }

    /// Usage at which `slot` rejects every write.
    pub fn hard_limit_for(&self, slot: &StorageSlot) -> u64 {
        slot.total_capacity_bytes
    }

    /// Connected, initialized, and below the safe limit.
    pub fn accepts_new_documents(&self, slot: &StorageSlot) -> bool {
        slot.is_connected && slot.is_initialized && slot.used_bytes < self.safe_limit_for(slot)
    }

    /// Below the hard limit.
    pub fn accepts_writes(&self, slot: &StorageSlot) -> bool {
        slot.used_bytes < self.hard_limit_for(slot)
    }
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self::from_config(&CapacityConfig::default())
    }
}
