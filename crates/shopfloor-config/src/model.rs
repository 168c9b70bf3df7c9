// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Shopfloor production office.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shopfloor_core::slot::{DEFAULT_HARD_LIMIT_BYTES, DEFAULT_SAFE_LIMIT_BYTES};

/// Top-level Shopfloor configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShopfloorConfig {
    /// Who is operating this session.
    #[serde(default)]
    pub session: SessionConfig,

    /// Persistence gateway settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Slot capacity thresholds.
    #[serde(default)]
    pub capacity: CapacityConfig,

    /// Poll loop cadences.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Toast lifetime and fan-out settings.
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Audit log retention.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Identity of the operator running this session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Employee id, used as the presence key.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Display name, compared against message senders and document handlers.
    #[serde(default = "default_user_name")]
    pub user_name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            user_name: default_user_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_user_id() -> String {
    "office".to_string()
}

fn default_user_name() -> String {
    "Office".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Persistence gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file backing the gateway.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Upper bound on any single gateway call.
    #[serde(default = "default_gateway_timeout_ms")]
    pub gateway_timeout_ms: u64,
}

impl StorageConfig {
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            gateway_timeout_ms: default_gateway_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("shopfloor").join("shopfloor.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("shopfloor.db"))
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

fn default_gateway_timeout_ms() -> u64 {
    10_000
}

/// Slot capacity thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CapacityConfig {
    /// Capacity given to newly configured slots; no write lands past it.
    #[serde(default = "default_hard_limit_bytes")]
    pub hard_limit_bytes: u64,

    /// New documents are only placed on slots below this usage.
    #[serde(default = "default_safe_limit_bytes")]
    pub safe_limit_bytes: u64,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            hard_limit_bytes: default_hard_limit_bytes(),
            safe_limit_bytes: default_safe_limit_bytes(),
        }
    }
}

fn default_hard_limit_bytes() -> u64 {
    DEFAULT_HARD_LIMIT_BYTES
}

fn default_safe_limit_bytes() -> u64 {
    DEFAULT_SAFE_LIMIT_BYTES
}

/// Poll loop cadences.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Document collection poll.
    #[serde(default = "default_document_interval_ms")]
    pub document_interval_ms: u64,

    /// Presence heartbeat.
    #[serde(default = "default_presence_interval_ms")]
    pub presence_interval_ms: u64,

    /// Slot banner and announcement poll.
    #[serde(default = "default_system_interval_ms")]
    pub system_interval_ms: u64,

    /// Users not seen for this long are considered offline.
    #[serde(default = "default_presence_timeout_ms")]
    pub presence_timeout_ms: u64,
}

impl PollingConfig {
    pub fn document_interval(&self) -> Duration {
        Duration::from_millis(self.document_interval_ms)
    }

    pub fn presence_interval(&self) -> Duration {
        Duration::from_millis(self.presence_interval_ms)
    }

    pub fn system_interval(&self) -> Duration {
        Duration::from_millis(self.system_interval_ms)
    }

    pub fn presence_timeout(&self) -> Duration {
        Duration::from_millis(self.presence_timeout_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            document_interval_ms: default_document_interval_ms(),
            presence_interval_ms: default_presence_interval_ms(),
            system_interval_ms: default_system_interval_ms(),
            presence_timeout_ms: default_presence_timeout_ms(),
        }
    }
}

fn default_document_interval_ms() -> u64 {
    2_000
}

fn default_presence_interval_ms() -> u64 {
    5_000
}

fn default_system_interval_ms() -> u64 {
    5_000
}

fn default_presence_timeout_ms() -> u64 {
    15_000
}

/// Notification dispatch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// How long a toast stays visible.
    #[serde(default = "default_toast_ttl_ms")]
    pub toast_ttl_ms: u64,

    /// Buffer of the broadcast channel feeding the rendering layer.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl NotificationConfig {
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            toast_ttl_ms: default_toast_ttl_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_toast_ttl_ms() -> u64 {
    3_000
}

fn default_channel_capacity() -> usize {
    256
}

/// Audit log settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Entries kept per log; the oldest are evicted past this.
    #[serde(default = "default_retention")]
    pub retention: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            retention: default_retention(),
        }
    }
}

fn default_retention() -> usize {
    500
}
