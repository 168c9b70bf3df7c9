// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Shopfloor production office.
//!
//! This crate provides the error type, the domain types shared by every
//! other crate, and the [`PersistenceGateway`] trait that storage backends
//! implement.

pub mod document;
pub mod error;
pub mod event;
pub mod slot;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use document::{
    latest_version, ApprovalItem, ApprovalStatus, Category, ChatMessage, DefectEntry, Document,
    DocumentId, DocumentStatus, Employee, FamilyKey, SpecLogEntry,
};
pub use error::ShopfloorError;
pub use event::{ChangeEvent, Notification, Toast, UrgentKind, UrgentNotification};
pub use slot::{SlotId, SlotStatus, StorageSlot, GIB};
pub use traits::{PersistenceGateway, PluginAdapter};
pub use types::{
    Announcement, AuditCategory, AuditEntry, DatasetKey, DatasetKind, HealthStatus, PresenceBeat,
    Record,
};
