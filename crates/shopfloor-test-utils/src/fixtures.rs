// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for domain values used across test suites.

use chrono::{NaiveDate, Utc};
use shopfloor_core::{
    ApprovalItem, ApprovalStatus, Category, ChatMessage, Document, SlotId, SlotStatus,
    StorageSlot, GIB,
};

/// Hard capacity given to fixture slots.
pub const FIXTURE_CAPACITY_BYTES: u64 = 15 * GIB;

/// A connected, initialized slot with the given usage.
pub fn ready_slot(id: u32, used_bytes: u64) -> StorageSlot {
    let mut slot = StorageSlot::new(SlotId(id), FIXTURE_CAPACITY_BYTES);
    slot.is_connected = true;
    slot.is_initialized = true;
    slot.used_bytes = used_bytes;
    slot.status = if used_bytes >= FIXTURE_CAPACITY_BYTES {
        SlotStatus::Full
    } else if used_bytes > 0 {
        SlotStatus::Active
    } else {
        SlotStatus::Ready
    };
    slot
}

/// A slot that is configured but has no credentials.
pub fn disconnected_slot(id: u32) -> StorageSlot {
    let mut slot = ready_slot(id, 0);
    slot.is_connected = false;
    slot
}

/// Parse a `YYYY-MM-DD` date, panicking on bad input.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date must be YYYY-MM-DD")
}

/// A document with a handler and no activity.
pub fn document(id: &str, sender: &str, title: &str, day: &str) -> Document {
    let mut doc = Document::new(id, sender, title, date(day));
    doc.handler = "Office".to_string();
    doc
}

/// A text message from `sender`.
pub fn message(id: &str, sender: &str, text: &str) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        sender: sender.to_string(),
        text: text.to_string(),
        image: None,
        sent_at: Utc::now(),
        from_self: false,
    }
}

/// A message carrying an image attachment.
pub fn image_message(id: &str, sender: &str) -> ChatMessage {
    ChatMessage {
        image: Some(format!("data:image/jpeg;base64,{id}")),
        ..message(id, sender, "")
    }
}

/// An approval item in the given state.
pub fn approval_item(id: &str, status: ApprovalStatus) -> ApprovalItem {
    ApprovalItem {
        id: id.to_string(),
        text: format!("flagged {id}"),
        category: Category::General,
        status,
        source_message_id: None,
        image: None,
        created_by: "QC".to_string(),
        created_at: Utc::now(),
    }
}
