// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage slot capacity management for the Shopfloor production office.
//!
//! This crate provides:
//! - **Capacity policy**: safe and hard thresholds applied per slot
//! - **Capacity ledger**: add-only byte accounting with threshold warnings
//! - **Slot registry**: slot configuration records behind the persistence gateway
//! - **Slot allocator**: placement of new documents and sticky routing of writes

pub mod allocator;
pub mod ledger;
pub mod policy;
pub mod registry;

pub use allocator::{select_slot_for_new_document, SlotAllocator};
pub use ledger::{apply_usage, CapacityLedger, Threshold, UsageUpdate};
pub use policy::CapacityPolicy;
pub use registry::{SlotPatch, SlotRegistry};
