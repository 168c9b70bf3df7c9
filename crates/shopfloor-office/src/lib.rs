// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Office core for Shopfloor.
//!
//! Loads the shared document collection, detects what other operators
//! changed since the last poll, classifies the activity into toasts, urgent
//! entries and badges, and routes every write through the capacity-checked
//! slot allocator. Background loops keep documents, presence and slot
//! availability fresh until the session's cancellation token fires.

pub mod announcements;
pub mod approvals;
pub mod audit;
pub mod classify;
pub mod diff;
pub mod dispatcher;
pub mod employees;
pub mod poller;
pub mod presence;
pub mod runtime;
pub mod seed;
pub mod service;
pub mod tasks;
pub mod text_classifier;

pub use announcements::AnnouncementBoard;
pub use approvals::{FoldTarget, Folded};
pub use audit::AuditLog;
pub use classify::{classify, Classification};
pub use diff::detect_changes;
pub use dispatcher::{NotificationCenter, View, ViewState};
pub use employees::EmployeeDirectory;
pub use poller::{run_poll_loop, PollTask};
pub use presence::PresenceTracker;
pub use runtime::Office;
pub use seed::seed_documents;
pub use service::{DocumentService, LoadedDocuments};
pub use tasks::{DocumentPoll, SystemPoll};
pub use text_classifier::{KeywordClassifier, TextClassifier};
