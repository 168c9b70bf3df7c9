// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of the office services over one persistence gateway.

use std::sync::Arc;

use shopfloor_capacity::{CapacityPolicy, SlotAllocator, SlotRegistry};
use shopfloor_config::model::ShopfloorConfig;
use shopfloor_core::PersistenceGateway;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::announcements::AnnouncementBoard;
use crate::audit::AuditLog;
use crate::dispatcher::NotificationCenter;
use crate::employees::EmployeeDirectory;
use crate::poller::{run_poll_loop, PollTask};
use crate::presence::PresenceTracker;
use crate::service::DocumentService;
use crate::tasks::{DocumentPoll, SystemPoll};
use crate::text_classifier::KeywordClassifier;

/// Every service of one operator session, sharing one gateway.
pub struct Office {
    config: ShopfloorConfig,
    pub registry: Arc<SlotRegistry>,
    pub allocator: Arc<SlotAllocator>,
    pub audit: Arc<AuditLog>,
    pub documents: Arc<DocumentService>,
    pub employees: Arc<EmployeeDirectory>,
    pub notifications: Arc<NotificationCenter>,
    pub presence: Arc<PresenceTracker>,
    pub announcements: Arc<AnnouncementBoard>,
}

impl Office {
    pub fn new(config: ShopfloorConfig, gateway: Arc<dyn PersistenceGateway>) -> Self {
        let policy = CapacityPolicy::from_config(&config.capacity);
        let registry = Arc::new(SlotRegistry::new(gateway.clone()));
        let allocator = Arc::new(SlotAllocator::new(registry.clone(), policy));
        let audit = Arc::new(AuditLog::new(gateway.clone(), config.audit.retention));
        let documents = Arc::new(DocumentService::new(
            gateway.clone(),
            allocator.clone(),
            audit.clone(),
            Arc::new(KeywordClassifier::default()),
            config.session.user_name.clone(),
        ));
        let employees = Arc::new(EmployeeDirectory::new(gateway.clone(), audit.clone()));
        let notifications = Arc::new(NotificationCenter::new(&config.notifications));
        let presence = Arc::new(PresenceTracker::new(
            gateway,
            config.session.user_id.clone(),
            config.polling.presence_timeout(),
        ));
        let announcements = Arc::new(AnnouncementBoard::new(allocator.clone()));

        Self {
            config,
            registry,
            allocator,
            audit,
            documents,
            employees,
            notifications,
            presence,
            announcements,
        }
    }

    pub fn config(&self) -> &ShopfloorConfig {
        &self.config
    }

    /// Start the document, presence and system loops.
    ///
    /// Each handle resolves to the loop's cycle count once `cancel` fires.
    pub fn spawn_poll_loops(&self, cancel: &CancellationToken) -> Vec<JoinHandle<u64>> {
        let polling = &self.config.polling;
        let documents: Arc<dyn PollTask> = Arc::new(DocumentPoll::new(
            self.documents.clone(),
            self.notifications.clone(),
        ));
        let presence: Arc<dyn PollTask> = self.presence.clone();
        let system: Arc<dyn PollTask> = Arc::new(SystemPoll::new(
            self.documents.clone(),
            self.announcements.clone(),
        ));
        let loops = [
            (documents, polling.document_interval()),
            (presence, polling.presence_interval()),
            (system, polling.system_interval()),
        ];

        info!(loops = loops.len(), "starting poll loops");
        loops
            .into_iter()
            .map(|(task, period)| tokio::spawn(run_poll_loop(task, period, cancel.child_token())))
            .collect()
    }
}
