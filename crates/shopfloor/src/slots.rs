// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `shopfloor slots` command implementations.

use std::io::IsTerminal;
use std::sync::Arc;

use shopfloor_capacity::{select_slot_for_new_document, CapacityPolicy, SlotRegistry};
use shopfloor_config::ShopfloorConfig;
use shopfloor_core::{AuditCategory, ShopfloorError, SlotStatus, StorageSlot, GIB};
use shopfloor_office::AuditLog;

use crate::open_gateway;

fn gib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / GIB as f64)
}

/// Render the slot table. The slot new documents would go to is starred.
pub(crate) fn render_slot_table(
    slots: &[StorageSlot],
    policy: &CapacityPolicy,
    use_color: bool,
) -> String {
    use colored::Colorize;

    if slots.is_empty() {
        return "  no storage slots configured\n".to_string();
    }

    let next = select_slot_for_new_document(slots, policy);
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<3} {:<4} {:<12} {:>10} {:>10} {:>7}  {}\n",
        "", "id", "status", "used GiB", "total GiB", "use", "name"
    ));
    out.push_str(&format!("  {}\n", "-".repeat(64)));
    for slot in slots {
        let marker = if next == Some(slot.id) { "*" } else { "" };
        let status = format!("{:<12}", slot.status.to_string());
        let status = if use_color {
            match slot.status {
                SlotStatus::Ready => status.green().to_string(),
                SlotStatus::Active if slot.used_bytes >= policy.safe_limit_for(slot) => {
                    status.yellow().to_string()
                }
                SlotStatus::Active => status.normal().to_string(),
                SlotStatus::Full | SlotStatus::Error => status.red().to_string(),
            }
        } else {
            status
        };
        let connection = if slot.is_connected && slot.is_initialized {
            ""
        } else {
            " (not connected)"
        };
        out.push_str(&format!(
            "  {:<3} {:<4} {} {:>10} {:>10} {:>6.1}%  {}{}\n",
            marker,
            slot.id,
            status,
            gib(slot.used_bytes),
            gib(slot.total_capacity_bytes),
            slot.utilization() * 100.0,
            slot.name,
            connection,
        ));
    }
    if next.is_none() {
        out.push_str("\n  no slot can take new documents\n");
    }
    out
}

/// Run `shopfloor slots list`.
pub async fn run_list(config: &ShopfloorConfig, plain: bool) -> Result<(), ShopfloorError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let gateway = open_gateway(config).await?;
    let registry = SlotRegistry::new(gateway.clone());
    let slots = registry.list_slots().await?;
    let policy = CapacityPolicy::from_config(&config.capacity);

    println!();
    println!("  shopfloor slots");
    print!("{}", render_slot_table(&slots, &policy, use_color));
    gateway.shutdown().await
}

/// Run `shopfloor slots configure --count N`.
pub async fn run_configure(config: &ShopfloorConfig, count: u32) -> Result<(), ShopfloorError> {
    crate::init_tracing(&config.session.log_level);
    let gateway = open_gateway(config).await?;
    let registry = SlotRegistry::new(gateway.clone());
    let slots = registry
        .configure(count, config.capacity.hard_limit_bytes)
        .await?;

    let audit = AuditLog::new(Arc::clone(&gateway), config.audit.retention);
    audit
        .record(
            AuditCategory::System,
            &config.session.user_name,
            "configure_slots",
            format!("count={count}"),
        )
        .await?;

    println!("shopfloor: {} storage slot(s) configured", slots.len());
    gateway.shutdown().await
}
