// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection management for the SQLite gateway.
//!
//! A single [`tokio_rusqlite::Connection`] serializes every call on its own
//! background thread, which gives each gateway call single-writer atomicity.

use std::path::Path;

use shopfloor_core::ShopfloorError;
use tracing::{debug, info};

use crate::migrations;

/// Map a tokio-rusqlite call failure into a storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> ShopfloorError {
    ShopfloorError::storage(e)
}

/// Open handle to the gateway database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` and run migrations.
    ///
    /// `":memory:"` opens a private in-memory database.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, ShopfloorError> {
        let conn = if path == ":memory:" {
            tokio_rusqlite::Connection::open_in_memory().await
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(ShopfloorError::storage)?;
            }
            tokio_rusqlite::Connection::open(path).await
        }
        .map_err(ShopfloorError::storage)?;

        let journal = if wal_mode { "WAL" } else { "DELETE" };
        let pragmas = format!(
            "PRAGMA journal_mode = {journal};
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;"
        );
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(&pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| -> Result<(), ShopfloorError> { migrations::run_migrations(conn) })
            .await
            .map_err(ShopfloorError::storage)?;

        info!(path, wal_mode, "gateway database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), ShopfloorError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("gateway database checkpointed");
        Ok(())
    }
}
