// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poll tasks driven by [`crate::poller::run_poll_loop`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use shopfloor_core::ShopfloorError;
use tracing::{debug, info};

use crate::announcements::AnnouncementBoard;
use crate::dispatcher::NotificationCenter;
use crate::poller::PollTask;
use crate::service::DocumentService;

/// Reloads documents and turns detected activity into notifications.
///
/// The first cycle that reaches storage only establishes the baseline. A
/// cycle that fell back to the seed set does not count as that baseline.
pub struct DocumentPoll {
    service: Arc<DocumentService>,
    center: Arc<NotificationCenter>,
    primed: AtomicBool,
}

impl DocumentPoll {
    pub fn new(service: Arc<DocumentService>, center: Arc<NotificationCenter>) -> Self {
        Self {
            service,
            center,
            primed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl PollTask for DocumentPoll {
    fn name(&self) -> &str {
        "documents"
    }

    async fn run_cycle(&self) -> Result<(), ShopfloorError> {
        let is_initial = !self.primed.load(Ordering::SeqCst);
        let loaded = self.service.load_documents(is_initial).await?;
        if !loaded.from_seed {
            self.primed.store(true, Ordering::SeqCst);
        }

        let pruned = self.center.prune_expired(Instant::now()).await;
        let dispatched = self.center.dispatch(&loaded.events).await;
        debug!(
            documents = loaded.documents.len(),
            events = loaded.events.len(),
            dispatched,
            pruned,
            "documents refreshed"
        );
        Ok(())
    }
}

/// Re-checks slot availability and surfaces new announcements.
pub struct SystemPoll {
    service: Arc<DocumentService>,
    board: Arc<AnnouncementBoard>,
}

impl SystemPoll {
    pub fn new(service: Arc<DocumentService>, board: Arc<AnnouncementBoard>) -> Self {
        Self { service, board }
    }
}

#[async_trait]
impl PollTask for SystemPoll {
    fn name(&self) -> &str {
        "system"
    }

    async fn run_cycle(&self) -> Result<(), ShopfloorError> {
        self.service.refresh_banner().await?;
        for announcement in self.board.poll_new().await? {
            info!(
                author = %announcement.author,
                text = %announcement.text,
                "new announcement"
            );
        }
        Ok(())
    }
}
