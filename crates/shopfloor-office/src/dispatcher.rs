// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification state and fan-out to the rendering layer.
//!
//! [`NotificationCenter`] owns the three projections (toasts, urgent list,
//! badge set) and the viewer selection they depend on. Every produced
//! [`Notification`] is also published on a broadcast channel; a send with no
//! subscribers is dropped.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use shopfloor_config::model::NotificationConfig;
use shopfloor_core::{
    latest_version, ChangeEvent, Document, DocumentId, FamilyKey, Notification, ShopfloorError,
    Toast, UrgentNotification,
};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::classify::classify;

/// Top-level screen shown by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    DocumentList,
    Slots,
}

/// What the viewer currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub active_view: View,
    pub selected_family: Option<FamilyKey>,
    /// The document open in the viewer.
    pub selected_document: Option<DocumentId>,
}

#[derive(Default)]
struct State {
    toasts: Vec<Toast>,
    urgent: Vec<UrgentNotification>,
    badges: BTreeSet<DocumentId>,
    view: ViewState,
}

impl State {
    /// Viewing a document acknowledges its badge and urgent entries.
    fn acknowledge(&mut self, document_id: &DocumentId) {
        self.badges.remove(document_id);
        self.urgent.retain(|u| &u.document_id != document_id);
    }
}

/// Holds notification projections and publishes them.
pub struct NotificationCenter {
    state: Mutex<State>,
    sender: broadcast::Sender<Notification>,
    toast_ttl: Duration,
}

impl NotificationCenter {
    pub fn new(config: &NotificationConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            state: Mutex::new(State::default()),
            sender,
            toast_ttl: config.toast_ttl(),
        }
    }

    /// Receive every notification published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    fn publish(&self, notification: Notification) {
        let _ = self.sender.send(notification);
    }

    /// Classify and record a batch of change events. Returns how many were handled.
    pub async fn dispatch(&self, events: &[ChangeEvent]) -> usize {
        if events.is_empty() {
            return 0;
        }
        let now = Instant::now();
        let mut state = self.state.lock().await;
        for event in events {
            let c = classify(
                event,
                state.view.selected_document.as_ref(),
                now,
                self.toast_ttl,
            );
            state.toasts.push(c.toast.clone());
            state.urgent.push(c.urgent.clone());
            self.publish(Notification::Toast(c.toast));
            self.publish(Notification::Urgent(c.urgent));
            if let Some(doc_id) = c.badge
                && state.badges.insert(doc_id.clone())
            {
                self.publish(Notification::Badge(doc_id));
            }
        }
        debug!(count = events.len(), "notifications dispatched");
        events.len()
    }

    /// Drop toasts whose time-to-live has passed. Returns how many were dropped.
    pub async fn prune_expired(&self, now: Instant) -> usize {
        let mut state = self.state.lock().await;
        let before = state.toasts.len();
        state.toasts.retain(|t| t.expires_at > now);
        before - state.toasts.len()
    }

    pub async fn toasts(&self) -> Vec<Toast> {
        self.state.lock().await.toasts.clone()
    }

    pub async fn urgent(&self) -> Vec<UrgentNotification> {
        self.state.lock().await.urgent.clone()
    }

    pub async fn badges(&self) -> BTreeSet<DocumentId> {
        self.state.lock().await.badges.clone()
    }

    pub async fn view(&self) -> ViewState {
        self.state.lock().await.view.clone()
    }

    /// Remove a toast or urgent entry by id without navigating.
    pub async fn dismiss(&self, notification_id: &str) -> bool {
        let mut state = self.state.lock().await;
        let before = state.toasts.len() + state.urgent.len();
        state.toasts.retain(|t| t.id != notification_id);
        state.urgent.retain(|u| u.id != notification_id);
        before != state.toasts.len() + state.urgent.len()
    }

    /// Switch the top-level view without changing the selection.
    pub async fn set_view(&self, view: View) {
        self.state.lock().await.view.active_view = view;
    }

    /// Open a document directly, acknowledging its activity.
    pub async fn open_document(&self, document: &Document) -> ViewState {
        let mut state = self.state.lock().await;
        state.view = ViewState {
            active_view: View::DocumentList,
            selected_family: Some(document.family_key()),
            selected_document: Some(document.id.clone()),
        };
        state.acknowledge(&document.id);
        state.view.clone()
    }

    /// Follow a toast or urgent notification to its document.
    ///
    /// Resolves the document's family, keeps the current selection if it is
    /// already a version of that family and otherwise selects the latest
    /// version, switches to the document list, and clears the document's
    /// badge and urgent entries. Returns `None` if the notification is gone.
    pub async fn open_from_notification(
        &self,
        notification_id: &str,
        documents: &[Document],
    ) -> Result<Option<ViewState>, ShopfloorError> {
        let mut state = self.state.lock().await;
        let target = state
            .toasts
            .iter()
            .find(|t| t.id == notification_id)
            .map(|t| t.document_id.clone())
            .or_else(|| {
                state
                    .urgent
                    .iter()
                    .find(|u| u.id == notification_id)
                    .map(|u| u.document_id.clone())
            });
        let Some(document_id) = target else {
            return Ok(None);
        };

        let document = documents
            .iter()
            .find(|d| d.id == document_id)
            .ok_or_else(|| ShopfloorError::DocumentNotFound(document_id.0.clone()))?;
        let family = document.family_key();

        let current_in_family = state.view.selected_document.as_ref().is_some_and(|selected| {
            documents
                .iter()
                .any(|d| &d.id == selected && d.belongs_to(&family))
        });
        if !current_in_family {
            state.view.selected_document =
                latest_version(documents, &family).map(|d| d.id.clone());
        }
        state.view.selected_family = Some(family);
        state.view.active_view = View::DocumentList;

        state.toasts.retain(|t| t.id != notification_id);
        state.acknowledge(&document_id);
        debug!(document_id = %document_id, "opened document from notification");
        Ok(Some(state.view.clone()))
    }
}
