// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Shopfloor integration tests.
//!
//! Provides fixtures and a scriptable gateway for fast, deterministic tests
//! without a database on disk.
//!
//! # Components
//!
//! - [`fixtures`] - Builders for slots, documents, messages and approval items
//! - [`FailingGateway`] - In-memory gateway whose reads and writes can be made to fail

pub mod failing_gateway;
pub mod fixtures;

pub use failing_gateway::FailingGateway;
