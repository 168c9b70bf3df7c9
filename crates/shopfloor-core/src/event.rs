// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change events detected between polled snapshots, and the notification
//! projections derived from them.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::document::{ApprovalItem, ChatMessage, DocumentId};

/// One detected unit of new activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    NewDocument {
        document_id: DocumentId,
        title: String,
        sender: String,
        handler: String,
    },
    NewMessage {
        document_id: DocumentId,
        title: String,
        sender: String,
        message: ChatMessage,
    },
    NewApprovalItem {
        document_id: DocumentId,
        title: String,
        sender: String,
        item: ApprovalItem,
    },
}

impl ChangeEvent {
    /// Document the event refers to.
    pub fn document_id(&self) -> &DocumentId {
        match self {
            Self::NewDocument { document_id, .. }
            | Self::NewMessage { document_id, .. }
            | Self::NewApprovalItem { document_id, .. } => document_id,
        }
    }

    /// Product title of the document the event refers to.
    pub fn title(&self) -> &str {
        match self {
            Self::NewDocument { title, .. }
            | Self::NewMessage { title, .. }
            | Self::NewApprovalItem { title, .. } => title,
        }
    }
}

/// Classification of a persistent notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgentKind {
    Msg,
    Image,
    Defect,
}

/// Ephemeral notification, gone after its time-to-live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: String,
    pub document_id: DocumentId,
    pub kind: UrgentKind,
    pub title: String,
    pub body: String,
    pub expires_at: Instant,
}

/// Persistent notification, kept until the user clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgentNotification {
    pub id: String,
    pub document_id: DocumentId,
    pub kind: UrgentKind,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// What the rendering layer receives from the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Toast(Toast),
    Urgent(UrgentNotification),
    /// A document gained an unacknowledged-activity badge.
    Badge(DocumentId),
}
