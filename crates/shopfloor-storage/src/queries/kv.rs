// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw key-value access to the `kv_store` table.

use rusqlite::{params, OptionalExtension};
use shopfloor_core::ShopfloorError;

use crate::database::{map_tr_err, Database};

/// Fetch the raw value stored under `key`.
pub async fn get(db: &Database, key: &str) -> Result<Option<String>, ShopfloorError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Store `value` under `key`, replacing any previous value.
pub async fn put(db: &Database, key: &str, value: String) -> Result<(), ShopfloorError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(key) DO UPDATE
                 SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Read-modify-write of one key inside a single transaction.
///
/// `apply` receives the current raw value and returns the new raw value (or
/// `None` to leave the row untouched) plus a result passed back to the caller.
pub async fn update<T, F>(db: &Database, key: &str, apply: F) -> Result<T, ShopfloorError>
where
    T: Send + 'static,
    F: FnOnce(Option<String>) -> Result<(Option<String>, T), ShopfloorError> + Send + 'static,
{
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<T, rusqlite::Error> {
            let tx = conn.transaction()?;
            let current: Option<String> = tx
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            let (next, out) =
                apply(current).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            if let Some(value) = next {
                tx.execute(
                    "INSERT INTO kv_store (key, value, updated_at)
                     VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                     ON CONFLICT(key) DO UPDATE
                 SET value = excluded.value, updated_at = excluded.updated_at",
                    params![key, value],
                )?;
            }
            tx.commit()?;
            Ok(out)
        })
        .await
        .map_err(map_tr_err)
}
