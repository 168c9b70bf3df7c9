// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change detection between two polled document snapshots.
//!
//! Growth is measured by length delta per field, not by identity. A field that
//! loses N entries and gains N in the same interval shows no change, and
//! removals never produce events.

use std::collections::HashMap;

use shopfloor_core::{ApprovalStatus, ChangeEvent, Document, DocumentId};

/// Events for everything `current` gained over `previous`.
///
/// Ordered by document in `current` order, then messages before approval
/// items, each in append order. Activity authored by `current_user` is
/// suppressed: new documents it handles and messages it sent.
pub fn detect_changes(
    previous: &[Document],
    current: &[Document],
    current_user: &str,
) -> Vec<ChangeEvent> {
    let before: HashMap<&DocumentId, &Document> =
        previous.iter().map(|doc| (&doc.id, doc)).collect();

    let mut events = Vec::new();
    for doc in current {
        match before.get(&doc.id) {
            None => {
                if doc.handler != current_user {
                    events.push(ChangeEvent::NewDocument {
                        document_id: doc.id.clone(),
                        title: doc.title.clone(),
                        sender: doc.sender.clone(),
                        handler: doc.handler.clone(),
                    });
                }
            }
            Some(old) => {
                if let Some(appended) = doc.messages.get(old.messages.len()..) {
                    events.extend(
                        appended
                            .iter()
                            .filter(|m| m.sender != current_user && !m.from_self)
                            .map(|m| ChangeEvent::NewMessage {
                                document_id: doc.id.clone(),
                                title: doc.title.clone(),
                                sender: m.sender.clone(),
                                message: m.clone(),
                            }),
                    );
                }
                if let Some(appended) = doc.approval_items.get(old.approval_items.len()..) {
                    events.extend(
                        appended
                            .iter()
                            .filter(|item| item.status == ApprovalStatus::Pending)
                            .map(|item| ChangeEvent::NewApprovalItem {
                                document_id: doc.id.clone(),
                                title: doc.title.clone(),
                                sender: item.created_by.clone(),
                                item: item.clone(),
                            }),
                    );
                }
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shopfloor_test_utils::fixtures::{approval_item, document, message};

    fn doc_with_messages(n: usize) -> Document {
        let mut doc = document("X", "Vinamilk", "Thùng sữa", "2026-02-01");
        for i in 0..n {
            doc.messages.push(message(&format!("m{i}"), "Lan", "ok"));
        }
        doc
    }

    #[test]
    fn identical_snapshots_yield_nothing() {
        let docs = vec![doc_with_messages(3)];
        assert!(detect_changes(&docs, &docs, "Office").is_empty());
    }

    #[test]
    fn self_sent_message_is_suppressed_others_kept() {
        let previous = vec![doc_with_messages(2)];
        let mut grown = doc_with_messages(2);
        grown.messages.push(message("m2", "Minh", "mine"));
        grown.messages.push(message("m3", "Lan", "theirs"));

        let events = detect_changes(&previous, &[grown], "Minh");
        assert_eq!(events.len(), 1);
        match &events[0] {
            ChangeEvent::NewMessage { message, .. } => assert_eq!(message.id, "m3"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn from_self_flag_is_suppressed() {
        let previous = vec![doc_with_messages(0)];
        let mut grown = doc_with_messages(0);
        let mut echoed = message("m0", "Lan", "echo");
        echoed.from_self = true;
        grown.messages.push(echoed);
        assert!(detect_changes(&previous, &[grown], "Minh").is_empty());
    }

    #[test]
    fn new_document_suppressed_for_its_handler() {
        let mut y = document("Y", "Sabeco", "Hộp bia", "2026-02-02");
        y.handler = "Alice".to_string();
        let current = vec![y];
        assert!(detect_changes(&[], &current, "Alice").is_empty());

        let events = detect_changes(&[], &current, "Bob");
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            ChangeEvent::NewDocument { document_id, .. } if document_id.0 == "Y"
        ));
    }

    #[test]
    fn new_document_does_not_report_its_messages() {
        let current = vec![doc_with_messages(4)];
        let events = detect_changes(&[], &current, "Bob");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn only_pending_approval_items_alert() {
        let previous = vec![doc_with_messages(0)];
        let mut grown = doc_with_messages(0);
        grown.approval_items.push(approval_item("a1", ApprovalStatus::Approved));
        grown.approval_items.push(approval_item("a2", ApprovalStatus::Pending));

        let events = detect_changes(&previous, &[grown], "Office");
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            ChangeEvent::NewApprovalItem { item, .. } if item.id == "a2"
        ));
    }

    #[test]
    fn removal_is_not_activity() {
        let mut before = doc_with_messages(0);
        before.approval_items.push(approval_item("a1", ApprovalStatus::Pending));
        let after = doc_with_messages(0);
        assert!(detect_changes(&[before], &[after], "Office").is_empty());
    }

    #[test]
    fn equal_removal_and_addition_is_invisible() {
        let mut before = doc_with_messages(0);
        before.approval_items.push(approval_item("a1", ApprovalStatus::Pending));
        let mut after = doc_with_messages(0);
        after.approval_items.push(approval_item("a2", ApprovalStatus::Pending));
        assert!(detect_changes(&[before], &[after], "Office").is_empty());
    }

    #[test]
    fn events_follow_document_then_field_order() {
        let a_before = doc_with_messages(0);
        let mut b_before = doc_with_messages(0);
        b_before.id = "B".into();
        let mut a_after = a_before.clone();
        a_after.approval_items.push(approval_item("a1", ApprovalStatus::Pending));
        a_after.messages.push(message("m1", "Lan", "first"));
        let mut b_after = b_before.clone();
        b_after.messages.push(message("m2", "Lan", "second"));
        b_after.messages.push(message("m3", "Lan", "third"));

        let events = detect_changes(&[a_before, b_before], &[b_after, a_after], "Office");
        let summary: Vec<(String, &'static str)> = events
            .iter()
            .map(|e| {
                let kind = match e {
                    ChangeEvent::NewMessage { .. } => "msg",
                    ChangeEvent::NewApprovalItem { .. } => "item",
                    ChangeEvent::NewDocument { .. } => "doc",
                };
                (e.document_id().0.clone(), kind)
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("B".to_string(), "msg"),
                ("B".to_string(), "msg"),
                ("X".to_string(), "msg"),
                ("X".to_string(), "item"),
            ]
        );
    }

    proptest! {
        #[test]
        fn unchanged_collection_never_emits(
            message_counts in proptest::collection::vec(0usize..5, 0..6),
            user in "[A-Za-z]{1,8}",
        ) {
            let docs: Vec<Document> = message_counts
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    let mut doc = doc_with_messages(*n);
                    doc.id = DocumentId(format!("d{i}"));
                    doc
                })
                .collect();
            prop_assert!(detect_changes(&docs, &docs, &user).is_empty());
        }
    }
}
