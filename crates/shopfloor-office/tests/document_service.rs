// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document service behaviour over shared in-memory storage.

use std::sync::Arc;

use shopfloor_capacity::{CapacityPolicy, SlotAllocator, SlotRegistry};
use shopfloor_core::{
    AuditCategory, ChangeEvent, DatasetKey, DatasetKind, Document, PersistenceGateway,
    ShopfloorError, SlotId, StorageSlot, GIB,
};
use shopfloor_office::{
    AuditLog, DocumentService, FoldTarget, Folded, KeywordClassifier, seed_documents,
};
use shopfloor_storage::MemoryGateway;
use shopfloor_test_utils::FailingGateway;
use shopfloor_test_utils::fixtures::{document, message, ready_slot};

fn service(gateway: Arc<dyn PersistenceGateway>, user: &str) -> DocumentService {
    let registry = Arc::new(SlotRegistry::new(gateway.clone()));
    let allocator = Arc::new(SlotAllocator::new(
        registry,
        CapacityPolicy::new(11 * GIB, 15 * GIB),
    ));
    let audit = Arc::new(AuditLog::new(gateway.clone(), 100));
    DocumentService::new(
        gateway,
        allocator,
        audit,
        Arc::new(KeywordClassifier::default()),
        user,
    )
}

async fn gateway_with(slots: &[StorageSlot]) -> Arc<dyn PersistenceGateway> {
    let gw: Arc<dyn PersistenceGateway> = Arc::new(MemoryGateway::new());
    gw.write_slot_config(slots).await.unwrap();
    gw
}

#[tokio::test]
async fn initial_load_produces_no_events() {
    let gw = gateway_with(&[ready_slot(1, 0)]).await;
    let lan = service(gw.clone(), "Lan");
    let minh = service(gw, "Minh");
    minh.add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await
        .unwrap();

    let loaded = lan.load_documents(true).await.unwrap();
    assert_eq!(loaded.documents.len(), 1);
    assert!(loaded.events.is_empty());
    assert!(!loaded.from_seed);
}

#[tokio::test]
async fn later_load_reports_activity_from_other_users() {
    let gw = gateway_with(&[ready_slot(1, 0)]).await;
    let lan = service(gw.clone(), "Lan");
    let minh = service(gw, "Minh");
    minh.add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await
        .unwrap();
    lan.load_documents(true).await.unwrap();

    minh.post_message("d1", message("m1", "Minh", "giấy về trễ"))
        .await
        .unwrap();
    lan.post_message("d1", message("m2", "Lan", "đã biết"))
        .await
        .unwrap();

    let loaded = lan.load_documents(false).await.unwrap();
    assert_eq!(loaded.events.len(), 1);
    match &loaded.events[0] {
        ChangeEvent::NewMessage { sender, message, .. } => {
            assert_eq!(sender, "Minh");
            assert_eq!(message.id, "m1");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_storage_on_first_load_falls_back_to_seed() {
    let failing = Arc::new(FailingGateway::new());
    failing.fail_reads(true);
    let lan = service(failing, "Lan");

    let loaded = lan.load_documents(true).await.unwrap();
    assert!(loaded.from_seed);
    assert_eq!(loaded.documents, seed_documents());
    assert_eq!(lan.snapshot().await, seed_documents());
}

#[tokio::test]
async fn transient_failure_keeps_last_snapshot() {
    let failing = Arc::new(FailingGateway::new());
    failing
        .inner()
        .write_slot_config(&[ready_slot(1, 0)])
        .await
        .unwrap();
    let lan = service(failing.clone(), "Lan");
    lan.add_document(document("d1", "Sabeco", "Hộp bia", "2026-01-12"))
        .await
        .unwrap();
    lan.load_documents(true).await.unwrap();

    failing.fail_reads(true);
    let err = lan.load_documents(false).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(lan.snapshot().await.len(), 1);
}

#[tokio::test]
async fn new_document_is_anchored_and_accounted() {
    let gw = gateway_with(&[ready_slot(1, 11 * GIB), ready_slot(2, 0)]).await;
    let lan = service(gw.clone(), "Lan");

    let slot = lan
        .add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await
        .unwrap();
    assert_eq!(slot, SlotId(2));

    let stored = lan.find_document("d1").await.unwrap();
    assert_eq!(stored.storage_slot_id, Some(SlotId(2)));
    let slots = gw.read_slot_config().await.unwrap();
    assert!(slots[1].used_bytes > 0);
    assert!(!lan.banner_raised());

    let audit = AuditLog::new(gw, 100);
    let entries = audit.entries(AuditCategory::Document).await.unwrap();
    assert_eq!(entries[0].action, "create");
}

#[tokio::test]
async fn no_eligible_slot_keeps_document_and_raises_banner() {
    let gw = gateway_with(&[ready_slot(1, 12 * GIB)]).await;
    let lan = service(gw, "Lan");

    let err = lan
        .add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShopfloorError::NoSlotAvailable));
    assert!(lan.banner_raised());

    let stored = lan.find_document("d1").await.unwrap();
    assert_eq!(stored.storage_slot_id, None);
}

#[tokio::test]
async fn banner_clears_once_a_slot_is_available() {
    let gw = gateway_with(&[]).await;
    let lan = service(gw.clone(), "Lan");
    assert!(lan.refresh_banner().await.unwrap());

    gw.write_slot_config(&[ready_slot(1, 0)]).await.unwrap();
    assert!(!lan.refresh_banner().await.unwrap());
    assert!(!lan.banner_raised());
}

#[tokio::test]
async fn anchored_document_writes_to_its_slot_past_safe_limit() {
    let gw = gateway_with(&[ready_slot(1, 0), ready_slot(2, 0)]).await;
    let lan = service(gw.clone(), "Lan");
    let mut doc = document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05");
    doc.storage_slot_id = Some(SlotId(1));
    lan.add_document(doc.clone()).await.unwrap();

    let mut slots = gw.read_slot_config().await.unwrap();
    slots[0].used_bytes = 12 * GIB;
    gw.write_slot_config(&slots).await.unwrap();

    doc.production_order = "LSX-2601-020".to_string();
    assert_eq!(lan.update_document(&doc).await.unwrap(), SlotId(1));
}

#[tokio::test]
async fn full_slot_rejects_writes() {
    let gw = gateway_with(&[ready_slot(1, 0)]).await;
    let lan = service(gw.clone(), "Lan");
    let mut doc = document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05");
    lan.add_document(doc.clone()).await.unwrap();

    let mut slots = gw.read_slot_config().await.unwrap();
    slots[0].used_bytes = 15 * GIB;
    gw.write_slot_config(&slots).await.unwrap();

    doc.storage_slot_id = Some(SlotId(1));
    let err = lan.update_document(&doc).await.unwrap_err();
    assert!(matches!(err, ShopfloorError::CapacityExhausted { .. }));
}

#[tokio::test]
async fn message_goes_to_document_and_slot_chat_log() {
    let gw = gateway_with(&[ready_slot(1, 0)]).await;
    let lan = service(gw.clone(), "Lan");
    lan.add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await
        .unwrap();

    lan.post_message("d1", message("m1", "Lan", "in lệch màu"))
        .await
        .unwrap();

    assert_eq!(lan.find_document("d1").await.unwrap().messages.len(), 1);
    let log = gw
        .read_dataset(&DatasetKey::slot(SlotId(1), DatasetKind::ChatLog))
        .await
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].id, "m1");
}

#[tokio::test]
async fn flagged_message_folds_into_defect_log() {
    let gw = gateway_with(&[ready_slot(1, 0)]).await;
    let lan = service(gw.clone(), "Lan");
    lan.add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await
        .unwrap();
    lan.post_message("d1", message("m1", "Tổ in", "IN bị lem mực"))
        .await
        .unwrap();

    let item = lan.flag_message("d1", "m1").await.unwrap();
    assert_eq!(item.category, shopfloor_core::Category::Printing);

    let folded = lan
        .resolve_approval("d1", &item.id, FoldTarget::Defect)
        .await
        .unwrap();
    assert!(matches!(folded, Folded::Defect(_)));

    let doc: Document = lan.find_document("d1").await.unwrap();
    assert!(doc.approval_items.is_empty());
    assert_eq!(doc.defects.len(), 1);
    let log = gw
        .read_dataset(&DatasetKey::slot(SlotId(1), DatasetKind::DefectLog))
        .await
        .unwrap();
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn deleting_a_family_removes_every_version() {
    let gw = gateway_with(&[ready_slot(1, 0)]).await;
    let lan = service(gw, "Lan");
    for (id, day) in [("d1", "2026-01-05"), ("d2", "2026-01-15")] {
        lan.add_document(document(id, "Vinamilk", "Thùng 24 hộp", day))
            .await
            .unwrap();
    }
    lan.add_document(document("d3", "Sabeco", "Hộp bia", "2026-01-12"))
        .await
        .unwrap();

    let deleted = lan
        .delete_document_group("Vinamilk", "Thùng 24 hộp")
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(lan.read_documents().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_document_is_reported() {
    let gw = gateway_with(&[ready_slot(1, 0)]).await;
    let lan = service(gw, "Lan");
    let err = lan
        .post_message("missing", message("m1", "Lan", "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShopfloorError::DocumentNotFound(_)));
}

#[tokio::test]
async fn message_on_slotless_document_is_kept() {
    let gw = gateway_with(&[]).await;
    let lan = service(gw.clone(), "Lan");
    let _ = lan
        .add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await;

    let err = lan
        .post_message("d1", message("m1", "Lan", "chờ cấu hình kho"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShopfloorError::NoSlotAvailable));
    assert_eq!(lan.find_document("d1").await.unwrap().messages.len(), 1);
}

async fn set_used(gw: &Arc<dyn PersistenceGateway>, used_bytes: u64) {
    let mut slots = gw.read_slot_config().await.unwrap();
    slots[0].used_bytes = used_bytes;
    gw.write_slot_config(&slots).await.unwrap();
}

#[tokio::test]
async fn message_near_hard_limit_lands_in_document_and_chat_log_together() {
    let gw = gateway_with(&[ready_slot(1, 0)]).await;
    let lan = service(gw.clone(), "Lan");
    lan.add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await
        .unwrap();
    set_used(&gw, 15 * GIB - 1).await;
    let chat_log = DatasetKey::slot(SlotId(1), DatasetKind::ChatLog);

    lan.post_message("d1", message("m1", "Lan", "máy dán hộp dừng"))
        .await
        .unwrap();
    assert_eq!(lan.find_document("d1").await.unwrap().messages.len(), 1);
    assert_eq!(gw.read_dataset(&chat_log).await.unwrap().len(), 1);

    let err = lan
        .post_message("d1", message("m2", "Lan", "đã chạy lại"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShopfloorError::CapacityExhausted { .. }));
    assert_eq!(lan.find_document("d1").await.unwrap().messages.len(), 1);
    assert_eq!(gw.read_dataset(&chat_log).await.unwrap().len(), 1);
}

#[tokio::test]
async fn defect_fold_near_hard_limit_is_never_half_applied() {
    let gw = gateway_with(&[ready_slot(1, 0)]).await;
    let lan = service(gw.clone(), "Lan");
    lan.add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await
        .unwrap();
    let first = lan
        .add_approval_item("d1", "lem mực mặt trước", None)
        .await
        .unwrap();
    let second = lan
        .add_approval_item("d1", "sai mã vạch", None)
        .await
        .unwrap();
    set_used(&gw, 15 * GIB - 1).await;
    let defect_log = DatasetKey::slot(SlotId(1), DatasetKind::DefectLog);

    lan.resolve_approval("d1", &first.id, FoldTarget::Defect)
        .await
        .unwrap();
    let doc = lan.find_document("d1").await.unwrap();
    assert_eq!(doc.approval_items.len(), 1);
    assert_eq!(doc.defects.len(), 1);
    assert_eq!(gw.read_dataset(&defect_log).await.unwrap().len(), 1);

    let err = lan
        .resolve_approval("d1", &second.id, FoldTarget::Defect)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopfloorError::CapacityExhausted { .. }));
    let doc = lan.find_document("d1").await.unwrap();
    assert_eq!(doc.approval_items.len(), 1);
    assert_eq!(doc.approval_items[0].id, second.id);
    assert_eq!(doc.defects.len(), 1);
    assert_eq!(gw.read_dataset(&defect_log).await.unwrap().len(), 1);
}
