// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Projection of change events into toast, urgent, and badge notifications.

use std::time::{Duration, Instant};

use chrono::Utc;
use shopfloor_core::{ChangeEvent, DocumentId, Toast, UrgentKind, UrgentNotification};

/// The three projections of one change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub toast: Toast,
    pub urgent: UrgentNotification,
    /// Set unless the event's document is the one open in the viewer.
    pub badge: Option<DocumentId>,
}

/// Urgent kind of an event.
///
/// Approval items are `DEFECT`; messages with an image are `IMAGE`; plain
/// messages and new documents are `MSG`.
pub fn urgent_kind(event: &ChangeEvent) -> UrgentKind {
    match event {
        ChangeEvent::NewApprovalItem { .. } => UrgentKind::Defect,
        ChangeEvent::NewMessage { message, .. } if message.has_image() => UrgentKind::Image,
        ChangeEvent::NewMessage { .. } | ChangeEvent::NewDocument { .. } => UrgentKind::Msg,
    }
}

fn body(event: &ChangeEvent) -> String {
    match event {
        ChangeEvent::NewDocument { sender, handler, .. } => {
            format!("New order from {sender}, handled by {handler}")
        }
        ChangeEvent::NewMessage {
            sender, message, ..
        } => {
            if message.text.is_empty() && message.has_image() {
                format!("{sender} sent an image")
            } else {
                format!("{sender}: {}", message.text)
            }
        }
        ChangeEvent::NewApprovalItem { sender, item, .. } => {
            format!("{sender} flagged for approval: {}", item.text)
        }
    }
}

/// Classify one event.
///
/// Every event yields exactly one toast (expiring `ttl` after `now`) and
/// exactly one urgent notification.
pub fn classify(
    event: &ChangeEvent,
    open_document: Option<&DocumentId>,
    now: Instant,
    ttl: Duration,
) -> Classification {
    let kind = urgent_kind(event);
    let document_id = event.document_id().clone();
    let title = event.title().to_string();
    let body = body(event);

    let badge = match open_document {
        Some(open) if *open == document_id => None,
        _ => Some(document_id.clone()),
    };

    Classification {
        toast: Toast {
            id: uuid::Uuid::new_v4().to_string(),
            document_id: document_id.clone(),
            kind,
            title: title.clone(),
            body: body.clone(),
            expires_at: now + ttl,
        },
        urgent: UrgentNotification {
            id: uuid::Uuid::new_v4().to_string(),
            document_id,
            kind,
            title,
            body,
            created_at: Utc::now(),
        },
        badge,
    }
}
