// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `shopfloor serve` command implementation.
//!
//! Opens storage, records the login, and runs the document, presence and
//! system poll loops. Notifications are written to the log as they are
//! produced. Ctrl+C or SIGTERM stops the loops and closes storage.

use shopfloor_config::ShopfloorConfig;
use shopfloor_core::{Notification, ShopfloorError};
use shopfloor_office::Office;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::shutdown::install_signal_handler;
use crate::{init_tracing, open_gateway};

pub async fn run_serve(config: ShopfloorConfig) -> Result<(), ShopfloorError> {
    init_tracing(&config.session.log_level);

    info!(user = %config.session.user_name, "starting shopfloor serve");

    let gateway = open_gateway(&config).await?;
    let office = Office::new(config, gateway.clone());
    let user_name = office.config().session.user_name.clone();

    if let Err(e) = office.audit.record_login(&user_name).await {
        warn!(error = %e, "failed to record login");
    }
    if office.documents.refresh_banner().await? {
        warn!("no storage slot can take new documents; run `shopfloor slots configure`");
    }

    let cancel = install_signal_handler();
    let mut notifications = office.notifications.subscribe();
    let handles = office.spawn_poll_loops(&cancel);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = notifications.recv() => match received {
                Ok(notification) => log_notification(&notification),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification listener fell behind");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    for handle in handles {
        match handle.await {
            Ok(cycles) => debug!(cycles, "poll loop joined"),
            Err(e) => warn!(error = %e, "poll loop panicked"),
        }
    }

    gateway.shutdown().await?;
    info!("shopfloor serve shutdown complete");
    Ok(())
}

fn log_notification(notification: &Notification) {
    match notification {
        Notification::Toast(toast) => {
            info!(
                document_id = %toast.document_id,
                kind = %toast.kind,
                title = %toast.title,
                "{}",
                toast.body
            );
        }
        Notification::Urgent(urgent) => {
            debug!(document_id = %urgent.document_id, kind = %urgent.kind, "urgent entry added");
        }
        Notification::Badge(document_id) => {
            debug!(document_id = %document_id, "unread badge raised");
        }
    }
}
