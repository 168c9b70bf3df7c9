// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System announcements, stored in each slot's announcement log.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use shopfloor_capacity::SlotAllocator;
use shopfloor_core::{Announcement, DatasetKey, DatasetKind, Record, ShopfloorError};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Posts announcements and reports the ones not seen yet.
pub struct AnnouncementBoard {
    allocator: Arc<SlotAllocator>,
    seen: Mutex<Option<HashSet<String>>>,
}

impl AnnouncementBoard {
    pub fn new(allocator: Arc<SlotAllocator>) -> Self {
        Self {
            allocator,
            seen: Mutex::new(None),
        }
    }

    /// Post an announcement on the slot new documents currently go to.
    pub async fn post(&self, author: &str, text: &str) -> Result<Announcement, ShopfloorError> {
        let slot_id = self
            .allocator
            .assign_slot_for_new_document()
            .await?
            .ok_or(ShopfloorError::NoSlotAvailable)?;
        let announcement = Announcement {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.to_string(),
            text: text.to_string(),
            posted_at: Utc::now(),
        };
        let record =
            Record::encode(&announcement.id, &announcement).map_err(ShopfloorError::storage)?;
        self.allocator
            .write_to_slot(
                slot_id,
                &DatasetKey::slot(slot_id, DatasetKind::AnnouncementLog),
                record,
            )
            .await?;
        info!(slot_id = %slot_id, author, "announcement posted");
        Ok(announcement)
    }

    /// Announcements across all slots, newest first.
    pub async fn list(&self) -> Result<Vec<Announcement>, ShopfloorError> {
        let registry = self.allocator.registry();
        let mut all = Vec::new();
        for slot in registry.list_slots().await? {
            let key = DatasetKey::slot(slot.id, DatasetKind::AnnouncementLog);
            for record in registry.gateway().read_dataset(&key).await? {
                match record.decode::<Announcement>() {
                    Ok(a) => all.push(a),
                    Err(e) => warn!(key = %key, error = %e, "skipping malformed announcement"),
                }
            }
        }
        all.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(all)
    }

    /// Announcements posted since the previous call, oldest first.
    ///
    /// The first call only records what already exists and returns nothing.
    pub async fn poll_new(&self) -> Result<Vec<Announcement>, ShopfloorError> {
        let current = self.list().await?;
        let mut seen = self.seen.lock().await;
        let Some(known) = seen.as_mut() else {
            *seen = Some(current.into_iter().map(|a| a.id).collect());
            return Ok(Vec::new());
        };
        let mut fresh: Vec<Announcement> = current
            .into_iter()
            .filter(|a| known.insert(a.id.clone()))
            .collect();
        fresh.reverse();
        Ok(fresh)
    }
}
