// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Shopfloor production office.

use thiserror::Error;

use crate::slot::SlotId;

/// The primary error type used across gateway traits and core operations.
#[derive(Debug, Error)]
pub enum ShopfloorError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence gateway errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No slot is connected, initialized and below its safe limit.
    ///
    /// Surfaced to the operator as a persistent configuration banner.
    #[error("no storage slot is available for new documents")]
    NoSlotAvailable,

    /// The target slot has reached its hard capacity limit.
    #[error("storage slot {slot_id} is full ({used_bytes} of {limit_bytes} bytes used)")]
    CapacityExhausted {
        slot_id: SlotId,
        used_bytes: u64,
        limit_bytes: u64,
    },

    /// A slot id was referenced that the registry does not know.
    #[error("storage slot {0} not found")]
    SlotNotFound(SlotId),

    /// A document id was referenced that is not in the collection.
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// A chat message id was referenced that the document does not hold.
    #[error("message {message_id} not found on document {document_id}")]
    MessageNotFound {
        document_id: String,
        message_id: String,
    },

    /// An approval item id was referenced that is not pending on the document.
    #[error("approval item {item_id} not found on document {document_id}")]
    ApprovalItemNotFound {
        document_id: String,
        item_id: String,
    },

    /// A caller-supplied value failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Gateway call did not complete within the configured bound.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ShopfloorError {
    /// Wrap any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Whether the failure is expected to clear on a later retry.
    ///
    /// Poll loops keep their last-known-good state on transient failures.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Timeout { .. })
    }
}
