// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot allocation and write routing.
//!
//! New documents go to the lowest-id slot that is connected, initialized and
//! below its safe limit. A document that already has a slot keeps writing to
//! it until the hard limit, and is never rerouted.
//!
//! Slot writes follow `authorize -> gateway write -> record_usage`. A failed
//! write is not accounted. A ledger failure after a successful write is
//! logged and left as is: the counter and the data are not transactionally
//! linked.

use std::sync::Arc;

use shopfloor_core::{DatasetKey, Document, Record, ShopfloorError, SlotId, StorageSlot};
use tracing::{debug, error};

use crate::ledger::CapacityLedger;
use crate::policy::CapacityPolicy;
use crate::registry::SlotRegistry;

/// First eligible slot in ascending id order, or `None`.
pub fn select_slot_for_new_document(
    slots: &[StorageSlot],
    policy: &CapacityPolicy,
) -> Option<SlotId> {
    slots
        .iter()
        .filter(|slot| policy.accepts_new_documents(slot))
        .map(|slot| slot.id)
        .min()
}

/// Picks destination slots and gates writes on capacity.
pub struct SlotAllocator {
    registry: Arc<SlotRegistry>,
    ledger: CapacityLedger,
    policy: CapacityPolicy,
}

impl SlotAllocator {
    pub fn new(registry: Arc<SlotRegistry>, policy: CapacityPolicy) -> Self {
        Self {
            ledger: CapacityLedger::new(registry.clone(), policy),
            registry,
            policy,
        }
    }

    pub fn registry(&self) -> &Arc<SlotRegistry> {
        &self.registry
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    pub fn policy(&self) -> &CapacityPolicy {
        &self.policy
    }

    /// Slot for a brand-new document, or `None` when no slot has headroom.
    pub async fn assign_slot_for_new_document(&self) -> Result<Option<SlotId>, ShopfloorError> {
        let slots = self.registry.list_slots().await?;
        let chosen = select_slot_for_new_document(&slots, &self.policy);
        match chosen {
            Some(slot_id) => debug!(slot_id = %slot_id, "slot assigned to new document"),
            None => error!(
                slots = slots.len(),
                "no storage slot is connected, initialized and below its safe limit"
            ),
        }
        Ok(chosen)
    }

    /// Slot a write for `document` goes to.
    ///
    /// An anchored document resolves to its own slot unconditionally; only
    /// slot-less documents are placed by [`Self::assign_slot_for_new_document`].
    pub async fn resolve_write_target(
        &self,
        document: &Document,
    ) -> Result<Option<SlotId>, ShopfloorError> {
        match document.storage_slot_id {
            Some(slot_id) => Ok(Some(slot_id)),
            None => self.assign_slot_for_new_document().await,
        }
    }

    /// Reject the write if the slot is at or past its hard limit.
    pub async fn authorize_write(&self, slot_id: SlotId) -> Result<StorageSlot, ShopfloorError> {
        let slot = self.registry.get_slot(slot_id).await?;
        if !self.policy.accepts_writes(&slot) {
            error!(
                slot_id = %slot_id,
                used_bytes = slot.used_bytes,
                limit_bytes = self.policy.hard_limit_for(&slot),
                "write rejected, storage slot is full"
            );
            return Err(ShopfloorError::CapacityExhausted {
                slot_id,
                used_bytes: slot.used_bytes,
                limit_bytes: self.policy.hard_limit_for(&slot),
            });
        }
        Ok(slot)
    }

    /// Write `record` to `key` on behalf of `slot_id` and account its size.
    ///
    /// Returns the number of bytes accounted.
    pub async fn write_to_slot(
        &self,
        slot_id: SlotId,
        key: &DatasetKey,
        record: Record,
    ) -> Result<u64, ShopfloorError> {
        self.write_group_to_slot(slot_id, vec![(key.clone(), record)])
            .await
    }

    /// Write several records as one capacity-gated operation.
    ///
    /// The slot is authorized once, the writes run in order, and their
    /// combined size is accounted afterwards. A failed write stops the group;
    /// bytes already written are still accounted before the error is returned.
    pub async fn write_group_to_slot(
        &self,
        slot_id: SlotId,
        writes: Vec<(DatasetKey, Record)>,
    ) -> Result<u64, ShopfloorError> {
        self.authorize_write(slot_id).await?;
        let mut written = 0u64;
        let mut outcome = Ok(());
        for (key, record) in writes {
            let bytes = record.size_bytes();
            if let Err(e) = self.registry.gateway().append_or_upsert(&key, record).await {
                outcome = Err(e);
                break;
            }
            written += bytes;
        }
        if written > 0
            && let Err(e) = self.ledger.record_usage(slot_id, written).await
        {
            error!(
                slot_id = %slot_id,
                bytes = written,
                error = %e,
                "write landed but usage could not be recorded"
            );
        }
        outcome.map(|()| written)
    }
}
