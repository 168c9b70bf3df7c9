// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot registry: the slot configuration record behind the persistence gateway.
//!
//! The registry holds no business rules. Read-modify-write cycles on the
//! configuration record are serialized in-process so a ledger update and a
//! configuration edit cannot interleave and lose each other.

use std::sync::Arc;

use shopfloor_core::{PersistenceGateway, ShopfloorError, SlotId, SlotStatus, StorageSlot};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Partial update of a slot. `None` leaves a field unchanged.
///
/// `used_bytes` is the explicit-correction path; normal accounting goes
/// through the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPatch {
    pub name: Option<String>,
    pub folder_locator: Option<Option<String>>,
    pub dataset_locator: Option<Option<String>>,
    pub total_capacity_bytes: Option<u64>,
    pub used_bytes: Option<u64>,
    pub is_connected: Option<bool>,
    pub is_initialized: Option<bool>,
    pub status: Option<SlotStatus>,
    pub owner_account: Option<Option<String>>,
}

impl SlotPatch {
    fn apply(self, slot: &mut StorageSlot) {
        if let Some(name) = self.name {
            slot.name = name;
        }
        if let Some(locator) = self.folder_locator {
            slot.folder_locator = locator;
        }
        if let Some(locator) = self.dataset_locator {
            slot.dataset_locator = locator;
        }
        if let Some(total) = self.total_capacity_bytes {
            slot.total_capacity_bytes = total;
        }
        if let Some(used) = self.used_bytes {
            slot.used_bytes = used;
        }
        if let Some(connected) = self.is_connected {
            slot.is_connected = connected;
        }
        if let Some(initialized) = self.is_initialized {
            slot.is_initialized = initialized;
        }
        if let Some(status) = self.status {
            slot.status = status;
        }
        if let Some(owner) = self.owner_account {
            slot.owner_account = owner;
        }
        reconcile_status(slot);
    }
}

/// Restore `status == Full` iff usage is at or past capacity.
pub(crate) fn reconcile_status(slot: &mut StorageSlot) {
    if slot.used_bytes >= slot.total_capacity_bytes {
        slot.status = SlotStatus::Full;
    } else if slot.status == SlotStatus::Full {
        slot.status = if slot.used_bytes == 0 {
            SlotStatus::Ready
        } else {
            SlotStatus::Active
        };
    }
}

/// Accessor over the persisted slot configuration.
pub struct SlotRegistry {
    gateway: Arc<dyn PersistenceGateway>,
    write_lock: Mutex<()>,
}

impl SlotRegistry {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            gateway,
            write_lock: Mutex::new(()),
        }
    }

    /// The gateway the registry reads from, shared with slot writers.
    pub fn gateway(&self) -> &Arc<dyn PersistenceGateway> {
        &self.gateway
    }

    /// All slots in ascending id order.
    pub async fn list_slots(&self) -> Result<Vec<StorageSlot>, ShopfloorError> {
        let mut slots = self.gateway.read_slot_config().await?;
        slots.sort_by_key(|s| s.id);
        Ok(slots)
    }

    pub async fn get_slot(&self, id: SlotId) -> Result<StorageSlot, ShopfloorError> {
        self.list_slots()
            .await?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(ShopfloorError::SlotNotFound(id))
    }

    pub async fn update_slot(
        &self,
        id: SlotId,
        patch: SlotPatch,
    ) -> Result<StorageSlot, ShopfloorError> {
        let (slot, ()) = self.modify(id, |slot| patch.apply(slot)).await?;
        debug!(slot_id = %id, status = %slot.status, "slot updated");
        Ok(slot)
    }

    /// Apply `f` to one slot and persist the whole configuration record.
    ///
    /// Returns the updated slot and whatever `f` returned. Nothing is written
    /// if the slot does not exist.
    pub async fn modify<R>(
        &self,
        id: SlotId,
        f: impl FnOnce(&mut StorageSlot) -> R,
    ) -> Result<(StorageSlot, R), ShopfloorError> {
        let _guard = self.write_lock.lock().await;
        let mut slots = self.list_slots().await?;
        let slot = slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ShopfloorError::SlotNotFound(id))?;
        let out = f(slot);
        let updated = slot.clone();
        self.gateway.write_slot_config(&slots).await?;
        Ok((updated, out))
    }

    /// Set up slots `1..=count`.
    ///
    /// Existing slots within range keep their ledger and settings. Missing ones
    /// are created connected and initialized with `capacity_bytes`. Slots with
    /// ids above `count` are removed.
    pub async fn configure(
        &self,
        count: u32,
        capacity_bytes: u64,
    ) -> Result<Vec<StorageSlot>, ShopfloorError> {
        let _guard = self.write_lock.lock().await;
        let existing = self.list_slots().await?;
        let slots: Vec<StorageSlot> = (1..=count)
            .map(SlotId)
            .map(|id| {
                existing
                    .iter()
                    .find(|s| s.id == id)
                    .cloned()
                    .unwrap_or_else(|| fresh_slot(id, capacity_bytes))
            })
            .collect();
        self.gateway.write_slot_config(&slots).await?;
        info!(count, capacity_bytes, "storage slots configured");
        Ok(slots)
    }
}

fn fresh_slot(id: SlotId, capacity_bytes: u64) -> StorageSlot {
    let mut slot = StorageSlot::new(id, capacity_bytes);
    slot.folder_locator = Some(format!("shopfloor/slot-{id}"));
    slot.dataset_locator = Some(format!("slot:{id}"));
    slot.is_connected = true;
    slot.is_initialized = true;
    slot
}
