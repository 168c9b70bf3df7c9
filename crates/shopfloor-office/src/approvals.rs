// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Approval workflow on a single document.
//!
//! Items enter as pending, either flagged from a chat message or entered
//! directly, and leave by being folded into a defect or spec-check entry.
//! A folded item no longer exists in the pending list.

use chrono::Utc;
use shopfloor_core::{
    ApprovalItem, ApprovalStatus, DefectEntry, Document, ShopfloorError, SpecLogEntry,
};

use crate::text_classifier::TextClassifier;

/// Where a resolved approval item is filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldTarget {
    Defect,
    SpecLog,
}

/// The permanent entry an approval item became.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Folded {
    Defect(DefectEntry),
    SpecLog(SpecLogEntry),
}

/// Flag a chat message for approval.
pub fn flag_message(
    doc: &mut Document,
    message_id: &str,
    flagged_by: &str,
    classifier: &dyn TextClassifier,
) -> Result<ApprovalItem, ShopfloorError> {
    let message = doc
        .messages
        .iter()
        .find(|m| m.id == message_id)
        .ok_or_else(|| ShopfloorError::MessageNotFound {
            document_id: doc.id.0.clone(),
            message_id: message_id.to_string(),
        })?;

    let item = ApprovalItem {
        id: uuid::Uuid::new_v4().to_string(),
        text: message.text.clone(),
        category: classifier.classify(&message.text),
        status: ApprovalStatus::Pending,
        source_message_id: Some(message.id.clone()),
        image: message.image.clone(),
        created_by: flagged_by.to_string(),
        created_at: Utc::now(),
    };
    doc.approval_items.push(item.clone());
    Ok(item)
}

/// Enter an approval item directly.
pub fn add_approval_item(
    doc: &mut Document,
    text: &str,
    image: Option<String>,
    created_by: &str,
    classifier: &dyn TextClassifier,
) -> ApprovalItem {
    let item = ApprovalItem {
        id: uuid::Uuid::new_v4().to_string(),
        text: text.to_string(),
        category: classifier.classify(text),
        status: ApprovalStatus::Pending,
        source_message_id: None,
        image,
        created_by: created_by.to_string(),
        created_at: Utc::now(),
    };
    doc.approval_items.push(item.clone());
    item
}

/// Move a pending item into the defect log or the spec-check log.
pub fn fold_approval(
    doc: &mut Document,
    item_id: &str,
    target: FoldTarget,
    resolved_by: &str,
) -> Result<Folded, ShopfloorError> {
    let index = doc
        .approval_items
        .iter()
        .position(|item| item.id == item_id && item.status == ApprovalStatus::Pending)
        .ok_or_else(|| ShopfloorError::ApprovalItemNotFound {
            document_id: doc.id.0.clone(),
            item_id: item_id.to_string(),
        })?;
    let item = doc.approval_items.remove(index);
    let now = Utc::now();

    Ok(match target {
        FoldTarget::Defect => {
            let entry = DefectEntry {
                id: item.id,
                category: item.category,
                description: item.text,
                image: item.image,
                reported_by: resolved_by.to_string(),
                recorded_at: now,
            };
            doc.defects.push(entry.clone());
            Folded::Defect(entry)
        }
        FoldTarget::SpecLog => {
            let entry = SpecLogEntry {
                id: item.id,
                category: item.category,
                note: item.text,
                checked_by: resolved_by.to_string(),
                recorded_at: now,
            };
            doc.spec_logs.push(entry.clone());
            Folded::SpecLog(entry)
        }
    })
}
