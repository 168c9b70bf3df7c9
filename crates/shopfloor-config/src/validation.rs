// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as threshold ordering and non-zero intervals.

use crate::diagnostic::ConfigError;
use crate::model::ShopfloorConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ShopfloorConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.session.user_id.trim().is_empty() {
        fail("session.user_id must not be empty".to_string());
    }
    if config.session.user_name.trim().is_empty() {
        fail("session.user_name must not be empty".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }
    if config.storage.gateway_timeout_ms == 0 {
        fail("storage.gateway_timeout_ms must be greater than 0".to_string());
    }

    let capacity = &config.capacity;
    if capacity.hard_limit_bytes == 0 {
        fail("capacity.hard_limit_bytes must be greater than 0".to_string());
    }
    if capacity.safe_limit_bytes >= capacity.hard_limit_bytes {
        fail(format!(
            "capacity.safe_limit_bytes ({}) must be below capacity.hard_limit_bytes ({})",
            capacity.safe_limit_bytes, capacity.hard_limit_bytes
        ));
    }

    let polling = &config.polling;
    for (key, value) in [
        ("polling.document_interval_ms", polling.document_interval_ms),
        ("polling.presence_interval_ms", polling.presence_interval_ms),
        ("polling.system_interval_ms", polling.system_interval_ms),
    ] {
        if value == 0 {
            fail(format!("{key} must be greater than 0"));
        }
    }
    if polling.presence_timeout_ms < polling.presence_interval_ms {
        fail(format!(
            "polling.presence_timeout_ms ({}) must be at least polling.presence_interval_ms ({})",
            polling.presence_timeout_ms, polling.presence_interval_ms
        ));
    }

    if config.notifications.channel_capacity == 0 {
        fail("notifications.channel_capacity must be greater than 0".to_string());
    }

    if config.audit.retention == 0 {
        fail("audit.retention must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
