// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence gateway backends for the Shopfloor production office.
//!
//! [`SqliteGateway`] is the durable backend. [`MemoryGateway`] shares its
//! encoding for tests, and [`TimeoutGateway`] bounds any backend's calls.

pub mod codec;
pub mod database;
pub mod memory;
pub mod migrations;
pub mod queries;
pub mod sqlite;
pub mod timeout;

pub use database::Database;
pub use memory::MemoryGateway;
pub use sqlite::SqliteGateway;
pub use timeout::TimeoutGateway;
