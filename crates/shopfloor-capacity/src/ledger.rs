// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Add-only byte accounting per slot.
//!
//! [`apply_usage`] is the pure arithmetic; [`CapacityLedger`] persists it
//! through the registry. Every call represents one real write and is counted
//! as such: recording the same write twice counts it twice.

use std::sync::Arc;

use chrono::Utc;
use shopfloor_core::{ShopfloorError, SlotId, SlotStatus, StorageSlot};
use tracing::{debug, warn};

use crate::policy::CapacityPolicy;
use crate::registry::SlotRegistry;

/// Highest threshold a single recorded write carried the slot across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Usage crossed the safe limit; the slot stops taking new documents.
    Safe,
    /// Usage reached the hard limit; the slot is full.
    Hard,
}

/// Result of one accounted write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageUpdate {
    pub slot_id: SlotId,
    pub previous_bytes: u64,
    pub used_bytes: u64,
    pub status: SlotStatus,
    pub crossed: Option<Threshold>,
}

/// Add `additional_bytes` to the slot and recompute its status.
///
/// `Full` iff usage is at or past capacity. A `Ready` slot becomes `Active`
/// on its first accounted write. Passing the safe limit never demotes an
/// active slot.
pub fn apply_usage(
    slot: &mut StorageSlot,
    additional_bytes: u64,
    policy: &CapacityPolicy,
) -> UsageUpdate {
    let previous_bytes = slot.used_bytes;
    slot.used_bytes = previous_bytes.saturating_add(additional_bytes);

    let hard = policy.hard_limit_for(slot);
    let safe = policy.safe_limit_for(slot);

    slot.status = if slot.used_bytes >= hard {
        SlotStatus::Full
    } else {
        match slot.status {
            SlotStatus::Ready | SlotStatus::Full => SlotStatus::Active,
            other => other,
        }
    };

    let crossed = if previous_bytes < hard && slot.used_bytes >= hard {
        Some(Threshold::Hard)
    } else if previous_bytes < safe && slot.used_bytes >= safe {
        Some(Threshold::Safe)
    } else {
        None
    };

    UsageUpdate {
        slot_id: slot.id,
        previous_bytes,
        used_bytes: slot.used_bytes,
        status: slot.status,
        crossed,
    }
}

/// Persistent capacity ledger over the slot registry.
pub struct CapacityLedger {
    registry: Arc<SlotRegistry>,
    policy: CapacityPolicy,
}

impl CapacityLedger {
    pub fn new(registry: Arc<SlotRegistry>, policy: CapacityPolicy) -> Self {
        Self { registry, policy }
    }

    /// Account one successful write of `additional_bytes` to `slot_id`.
    pub async fn record_usage(
        &self,
        slot_id: SlotId,
        additional_bytes: u64,
    ) -> Result<UsageUpdate, ShopfloorError> {
        let policy = self.policy;
        let (slot, update) = self
            .registry
            .modify(slot_id, |slot| {
                slot.last_sync = Some(Utc::now());
                apply_usage(slot, additional_bytes, &policy)
            })
            .await?;

        match update.crossed {
            Some(Threshold::Hard) => warn!(
                slot_id = %slot_id,
                used_bytes = update.used_bytes,
                limit_bytes = policy.hard_limit_for(&slot),
                "storage slot is full, further writes will be rejected"
            ),
            Some(Threshold::Safe) => warn!(
                slot_id = %slot_id,
                used_bytes = update.used_bytes,
                safe_limit_bytes = policy.safe_limit_for(&slot),
                "storage slot passed its safe limit, new documents go elsewhere"
            ),
            None => debug!(
                slot_id = %slot_id,
                additional_bytes,
                used_bytes = update.used_bytes,
                "usage recorded"
            ),
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shopfloor_storage::MemoryGateway;

    fn slot(total: u64) -> StorageSlot {
        let mut slot = StorageSlot::new(SlotId(1), total);
        slot.is_connected = true;
        slot.is_initialized = true;
        slot
    }

    fn policy() -> CapacityPolicy {
        CapacityPolicy::new(70, 100)
    }

    #[test]
    fn first_write_activates_ready_slot() {
        let mut s = slot(100);
        let update = apply_usage(&mut s, 10, &policy());
        assert_eq!(update.status, SlotStatus::Active);
        assert_eq!(update.crossed, None);
    }

    #[test]
    fn crossing_safe_limit_keeps_slot_active() {
        let mut s = slot(100);
        apply_usage(&mut s, 60, &policy());
        let update = apply_usage(&mut s, 15, &policy());
        assert_eq!(update.status, SlotStatus::Active);
        assert_eq!(update.crossed, Some(Threshold::Safe));
    }

    #[test]
    fn jump_past_both_limits_reports_hard() {
        let mut s = slot(100);
        let update = apply_usage(&mut s, 150, &policy());
        assert_eq!(update.status, SlotStatus::Full);
        assert_eq!(update.crossed, Some(Threshold::Hard));
        assert_eq!(update.used_bytes, 150);
    }

    #[test]
    fn error_status_survives_below_hard_limit() {
        let mut s = slot(100);
        s.status = SlotStatus::Error;
        assert_eq!(apply_usage(&mut s, 5, &policy()).status, SlotStatus::Error);
    }

    proptest! {
        #[test]
        fn usage_is_sum_of_increments_and_full_tracks_hard_limit(
            total in 1u64..10_000,
            increments in proptest::collection::vec(0u64..2_000, 0..40),
        ) {
            let policy = CapacityPolicy::new(total / 2, total);
            let mut s = slot(total);
            let mut running = 0u64;
            for inc in increments {
                let update = apply_usage(&mut s, inc, &policy);
                running += inc;
                prop_assert_eq!(update.used_bytes, running);
                prop_assert_eq!(s.used_bytes, running);
                prop_assert_eq!(s.status == SlotStatus::Full, running >= total);
            }
        }
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn ledger_persists_and_warns_at_hard_limit() {
        let registry = Arc::new(SlotRegistry::new(Arc::new(MemoryGateway::new())));
        registry.configure(1, 100).await.unwrap();
        let ledger = CapacityLedger::new(registry.clone(), policy());

        ledger.record_usage(SlotId(1), 40).await.unwrap();
        let update = ledger.record_usage(SlotId(1), 60).await.unwrap();
        assert_eq!(update.status, SlotStatus::Full);

        let stored = registry.get_slot(SlotId(1)).await.unwrap();
        assert_eq!(stored.used_bytes, 100);
        assert_eq!(stored.status, SlotStatus::Full);
        assert!(stored.last_sync.is_some());
        assert!(logs_contain("storage slot is full"));
    }

    #[tokio::test]
    async fn recording_twice_counts_twice() {
        let registry = Arc::new(SlotRegistry::new(Arc::new(MemoryGateway::new())));
        registry.configure(1, 100).await.unwrap();
        let ledger = CapacityLedger::new(registry.clone(), policy());
        ledger.record_usage(SlotId(1), 7).await.unwrap();
        ledger.record_usage(SlotId(1), 7).await.unwrap();
        assert_eq!(registry.get_slot(SlotId(1)).await.unwrap().used_bytes, 14);
    }
}
