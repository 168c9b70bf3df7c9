// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the gateway trait and the office services.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::slot::SlotId;

/// Health status reported by gateway health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Gateway is fully operational.
    Healthy,
    /// Gateway is operational but experiencing issues.
    Degraded(String),
    /// Gateway is not operational.
    Unhealthy(String),
}

/// Per-slot dataset types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKind {
    ChatLog,
    DefectLog,
    AnnouncementLog,
}

/// Partition of the action audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditCategory {
    Document,
    Employee,
    System,
}

/// Logical location of a dataset in the gateway key-space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    /// The master document collection.
    Documents,
    /// The master employee collection.
    Employees,
    /// User id -> last-seen epoch millis.
    Presence,
    /// Action audit log for one category.
    Audit(AuditCategory),
    /// Login audit log.
    LoginAudit,
    /// A dataset owned by one storage slot.
    Slot { slot_id: SlotId, kind: DatasetKind },
}

impl DatasetKey {
    pub fn slot(slot_id: SlotId, kind: DatasetKind) -> Self {
        Self::Slot { slot_id, kind }
    }

    /// Flat string key used by key-value backends.
    pub fn storage_key(&self) -> String {
        match self {
            Self::Documents => "documents".to_string(),
            Self::Employees => "employees".to_string(),
            Self::Presence => "presence".to_string(),
            Self::Audit(category) => format!("audit:{}", category.to_string().to_lowercase()),
            Self::LoginAudit => "audit:login".to_string(),
            Self::Slot { slot_id, kind } => format!("slot:{slot_id}:{kind}"),
        }
    }
}

impl std::fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// One keyed record in a dataset.
///
/// Serialized as a flat JSON object carrying its `id` alongside the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    /// Encode a value that serializes to a JSON object.
    pub fn encode<T: Serialize>(
        id: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        use serde::ser::Error as _;

        let mut fields = match serde_json::to_value(value)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(serde_json::Error::custom(format!(
                    "record body must be a JSON object, got {other}"
                )));
            }
        };
        fields.remove("id");
        Ok(Self {
            id: id.into(),
            fields,
        })
    }

    /// Decode the record back into a typed value; `id` is restored into the object.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let mut map = self.fields.clone();
        map.insert("id".to_string(), serde_json::Value::String(self.id.clone()));
        serde_json::from_value(serde_json::Value::Object(map))
    }

    /// Size of the serialized record, the unit the capacity ledger accounts in.
    pub fn size_bytes(&self) -> u64 {
        serde_json::to_vec(self).map_or(0, |bytes| bytes.len() as u64)
    }
}

/// A system-wide announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub author: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

/// One action recorded in an audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub actor: String,
    pub action: String,
    #[serde(default)]
    pub detail: String,
    pub at: DateTime<Utc>,
}

/// Last heartbeat of one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceBeat {
    pub last_seen_ms: i64,
}
