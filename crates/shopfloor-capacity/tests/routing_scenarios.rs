// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end slot routing against an in-memory gateway.

use std::sync::Arc;

use serde_json::json;
use shopfloor_capacity::{CapacityPolicy, SlotAllocator, SlotRegistry};
use shopfloor_core::{
    DatasetKey, DatasetKind, PersistenceGateway, Record, ShopfloorError, SlotId, SlotStatus,
    StorageSlot, GIB,
};
use shopfloor_storage::MemoryGateway;
use shopfloor_test_utils::fixtures::{document, ready_slot};

async fn allocator(slots: &[StorageSlot]) -> (Arc<MemoryGateway>, SlotAllocator) {
    let gw = Arc::new(MemoryGateway::new());
    gw.write_slot_config(slots).await.unwrap();
    let registry = Arc::new(SlotRegistry::new(gw.clone()));
    let allocator = SlotAllocator::new(registry, CapacityPolicy::new(11 * GIB, 15 * GIB));
    (gw, allocator)
}

fn chat_record(id: &str) -> Record {
    Record::encode(id, &json!({ "sender": "Lan", "text": "mực in bị lem" })).unwrap()
}

#[tokio::test]
async fn new_document_goes_to_first_slot_with_headroom() {
    let (_gw, allocator) = allocator(&[ready_slot(1, 10 * GIB), ready_slot(2, 0)]).await;
    let assigned = allocator.assign_slot_for_new_document().await.unwrap();
    assert_eq!(assigned, Some(SlotId(1)));
}

#[tokio::test]
async fn new_document_skips_slot_past_safe_limit() {
    let (_gw, allocator) = allocator(&[ready_slot(1, 11 * GIB), ready_slot(2, 0)]).await;
    let assigned = allocator.assign_slot_for_new_document().await.unwrap();
    assert_eq!(assigned, Some(SlotId(2)));
}

#[tokio::test]
async fn anchored_document_keeps_writing_in_buffer_zone() {
    let start = 11 * GIB + GIB / 2;
    let (gw, allocator) = allocator(&[ready_slot(1, start), ready_slot(2, 0)]).await;
    let mut doc = document("D", "Vinamilk", "Thùng 5 lớp", "2026-03-01");
    doc.storage_slot_id = Some(SlotId(1));

    let target = allocator.resolve_write_target(&doc).await.unwrap();
    assert_eq!(target, Some(SlotId(1)));

    let key = DatasetKey::slot(SlotId(1), DatasetKind::ChatLog);
    let record = chat_record("m1");
    let size = record.size_bytes();
    allocator.write_to_slot(SlotId(1), &key, record).await.unwrap();

    let slot = allocator.registry().get_slot(SlotId(1)).await.unwrap();
    assert_eq!(slot.used_bytes, start + size);
    assert_eq!(slot.status, SlotStatus::Active);
    assert_eq!(gw.read_dataset(&key).await.unwrap().len(), 1);
}

#[tokio::test]
async fn write_to_full_slot_is_rejected_and_not_rerouted() {
    let (gw, allocator) = allocator(&[ready_slot(1, 15 * GIB), ready_slot(2, 0)]).await;
    let mut doc = document("D", "Vinamilk", "Thùng 5 lớp", "2026-03-01");
    doc.storage_slot_id = Some(SlotId(1));

    let target = allocator.resolve_write_target(&doc).await.unwrap();
    assert_eq!(target, Some(SlotId(1)));

    let key = DatasetKey::slot(SlotId(1), DatasetKind::ChatLog);
    let err = allocator
        .write_to_slot(SlotId(1), &key, chat_record("m1"))
        .await
        .unwrap_err();
    match err {
        ShopfloorError::CapacityExhausted {
            slot_id,
            used_bytes,
            limit_bytes,
        } => {
            assert_eq!(slot_id, SlotId(1));
            assert_eq!(used_bytes, 15 * GIB);
            assert_eq!(limit_bytes, 15 * GIB);
        }
        other => panic!("expected CapacityExhausted, got {other:?}"),
    }

    let slot = allocator.registry().get_slot(SlotId(1)).await.unwrap();
    assert_eq!(slot.used_bytes, 15 * GIB);
    assert!(gw.read_dataset(&key).await.unwrap().is_empty());
    let other = allocator.registry().get_slot(SlotId(2)).await.unwrap();
    assert_eq!(other.used_bytes, 0);
}

#[tokio::test]
async fn write_that_crosses_hard_limit_lands_then_slot_is_full() {
    let (_gw, allocator) = allocator(&[ready_slot(1, 15 * GIB - 1)]).await;
    let key = DatasetKey::slot(SlotId(1), DatasetKind::DefectLog);
    allocator.write_to_slot(SlotId(1), &key, chat_record("d1")).await.unwrap();

    let slot = allocator.registry().get_slot(SlotId(1)).await.unwrap();
    assert_eq!(slot.status, SlotStatus::Full);
    assert!(allocator
        .write_to_slot(SlotId(1), &key, chat_record("d2"))
        .await
        .is_err());
}

#[tokio::test]
async fn slotless_document_without_capacity_resolves_to_none() {
    let (_gw, allocator) = allocator(&[ready_slot(1, 12 * GIB)]).await;
    let doc = document("N", "Sabeco", "Hộp bia", "2026-03-02");
    assert_eq!(allocator.resolve_write_target(&doc).await.unwrap(), None);
}
