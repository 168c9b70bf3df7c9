// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An operator session over a real SQLite file, across restarts.

use std::sync::Arc;
use std::time::Duration;

use shopfloor_capacity::SlotRegistry;
use shopfloor_config::ShopfloorConfig;
use shopfloor_core::{PersistenceGateway, SlotId};
use shopfloor_office::Office;
use shopfloor_storage::{SqliteGateway, TimeoutGateway};
use shopfloor_test_utils::fixtures::{document, message};

fn config_for(dir: &tempfile::TempDir, user: &str) -> ShopfloorConfig {
    let mut config = ShopfloorConfig::default();
    config.storage.database_path = dir
        .path()
        .join("shopfloor.db")
        .to_string_lossy()
        .into_owned();
    config.session.user_id = user.to_lowercase();
    config.session.user_name = user.to_string();
    config
}

async fn open(config: &ShopfloorConfig) -> Arc<dyn PersistenceGateway> {
    let sqlite = SqliteGateway::open(&config.storage).await.unwrap();
    Arc::new(TimeoutGateway::new(sqlite, Duration::from_secs(10)))
}

#[tokio::test]
async fn documents_and_ledger_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "Lan");

    let gateway = open(&config).await;
    SlotRegistry::new(gateway.clone())
        .configure(2, config.capacity.hard_limit_bytes)
        .await
        .unwrap();
    let office = Office::new(config.clone(), gateway.clone());
    let slot = office
        .documents
        .add_document(document("d1", "Vinamilk", "Thùng 24 hộp", "2026-01-05"))
        .await
        .unwrap();
    assert_eq!(slot, SlotId(1));
    office
        .documents
        .post_message("d1", message("m1", "Lan", "đã lên khuôn"))
        .await
        .unwrap();
    let used_before = office.registry.get_slot(SlotId(1)).await.unwrap().used_bytes;
    gateway.shutdown().await.unwrap();
    drop(office);
    drop(gateway);

    let gateway = open(&config).await;
    let office = Office::new(config, gateway);
    let loaded = office.documents.load_documents(true).await.unwrap();
    assert!(!loaded.from_seed);
    assert_eq!(loaded.documents.len(), 1);
    assert_eq!(loaded.documents[0].messages.len(), 1);
    assert_eq!(
        office.registry.get_slot(SlotId(1)).await.unwrap().used_bytes,
        used_before
    );
}

#[tokio::test]
async fn login_is_audited() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "Minh");
    let gateway = open(&config).await;
    let office = Office::new(config, gateway);

    office.audit.record_login("Minh").await.unwrap();
    let logins = office.audit.logins().await.unwrap();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].actor, "Minh");
}
