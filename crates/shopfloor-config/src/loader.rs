// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./shopfloor.toml` > `~/.config/shopfloor/shopfloor.toml`
//! > `/etc/shopfloor/shopfloor.toml` with environment variable overrides via
//! the `SHOPFLOOR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ShopfloorConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/shopfloor/shopfloor.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "shopfloor.toml";

/// Sections whose keys may be set from `SHOPFLOOR_<SECTION>_<KEY>`.
const ENV_SECTIONS: &[&str] = &[
    "session",
    "storage",
    "capacity",
    "polling",
    "notifications",
    "audit",
];

/// Per-user config file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shopfloor").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/shopfloor/shopfloor.toml` (system-wide)
/// 3. `~/.config/shopfloor/shopfloor.toml` (user XDG config)
/// 4. `./shopfloor.toml` (local directory)
/// 5. `SHOPFLOOR_*` environment variables
pub fn load_config() -> Result<ShopfloorConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ShopfloorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ShopfloorConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ShopfloorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ShopfloorConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ShopfloorConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `SHOPFLOOR_POLLING_DOCUMENT_INTERVAL_MS` to
/// `polling.document_interval_ms`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that contain underscores stay intact.
fn env_provider() -> Env {
    Env::prefixed("SHOPFLOOR_").map(|key| {
        let key_str = key.as_str();
        ENV_SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or_else(|| key_str.to_string())
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SHOPFLOOR_POLLING_DOCUMENT_INTERVAL_MS", "750");
            jail.set_env("SHOPFLOOR_SESSION_USER_NAME", "Minh");
            let config: ShopfloorConfig = Figment::new()
                .merge(Serialized::defaults(ShopfloorConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.polling.document_interval_ms, 750);
            assert_eq!(config.session.user_name, "Minh");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
[capacity]
safe_limit_bytes = 1000
hard_limit_bytes = 2000
"#,
            )?;
            let config = load_config_from_path(Path::new(LOCAL_CONFIG_FILE))?;
            assert_eq!(config.capacity.safe_limit_bytes, 1000);
            assert_eq!(config.capacity.hard_limit_bytes, 2000);
            Ok(())
        });
    }
}
