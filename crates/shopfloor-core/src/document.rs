// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Production-order documents and the records attached to them.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::slot::SlotId;

/// Unique identifier for a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Production stage a flagged note belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    /// Corrugating line (SÓNG).
    Corrugation,
    /// Printing (IN).
    Printing,
    /// Finished goods (THÀNH PHẨM).
    FinishedGoods,
    /// Warehouse (KHO).
    Warehouse,
    /// Accounting (TCKT).
    Accounting,
    #[default]
    General,
}

/// Workflow state of a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    New,
    InProduction,
    OnHold,
    Completed,
}

/// A chat message posted on a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    /// Display name of the author.
    pub sender: String,
    #[serde(default)]
    pub text: String,
    /// Compressed image payload (data URL), if the message carries one.
    #[serde(default)]
    pub image: Option<String>,
    pub sent_at: DateTime<Utc>,
    /// Set by the client that authored the message.
    #[serde(default)]
    pub from_self: bool,
}

impl ChatMessage {
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Review state of an approval item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
}

/// A flagged note awaiting categorization into a defect or spec log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub status: ApprovalStatus,
    /// Chat message this item was flagged from, if any.
    #[serde(default)]
    pub source_message_id: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// A recorded production defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectEntry {
    pub id: String,
    pub category: Category,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub reported_by: String,
    pub recorded_at: DateTime<Utc>,
}

/// A technical-specification check recorded against a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecLogEntry {
    pub id: String,
    pub category: Category,
    pub note: String,
    pub checked_by: String,
    pub recorded_at: DateTime<Utc>,
}

/// Customer + product pair identifying a document family.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FamilyKey {
    pub sender: String,
    pub title: String,
}

impl std::fmt::Display for FamilyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.sender, self.title)
    }
}

/// A production order for one product, one version of its family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Customer.
    pub sender: String,
    /// Product name.
    pub title: String,
    #[serde(default)]
    pub production_order: String,
    pub date: NaiveDate,
    /// Staff member who created the order.
    #[serde(default)]
    pub handler: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    #[serde(default)]
    pub defects: Vec<DefectEntry>,
    #[serde(default)]
    pub spec_logs: Vec<SpecLogEntry>,
    #[serde(default)]
    pub approval_items: Vec<ApprovalItem>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Slot this document's writes are routed to. Assigned once.
    #[serde(default)]
    pub storage_slot_id: Option<SlotId>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: DocumentId(id.into()),
            sender: sender.into(),
            title: title.into(),
            production_order: String::new(),
            date,
            handler: String::new(),
            status: DocumentStatus::New,
            specs: BTreeMap::new(),
            defects: Vec::new(),
            spec_logs: Vec::new(),
            approval_items: Vec::new(),
            messages: Vec::new(),
            storage_slot_id: None,
        }
    }

    pub fn family_key(&self) -> FamilyKey {
        FamilyKey {
            sender: self.sender.clone(),
            title: self.title.clone(),
        }
    }

    pub fn belongs_to(&self, family: &FamilyKey) -> bool {
        self.sender == family.sender && self.title == family.title
    }

    pub fn pending_approvals(&self) -> impl Iterator<Item = &ApprovalItem> {
        self.approval_items
            .iter()
            .filter(|item| item.status == ApprovalStatus::Pending)
    }
}

/// Latest version of a family: the most recent `date`, last in order on ties.
pub fn latest_version<'a>(documents: &'a [Document], family: &FamilyKey) -> Option<&'a Document> {
    documents
        .iter()
        .filter(|doc| doc.belongs_to(family))
        .max_by_key(|doc| doc.date)
}

/// A staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
}
