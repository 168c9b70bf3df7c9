// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `shopfloor employees` command implementations.

use std::sync::Arc;

use shopfloor_config::ShopfloorConfig;
use shopfloor_core::{Employee, PersistenceGateway, ShopfloorError};
use shopfloor_office::{AuditLog, EmployeeDirectory};

use crate::open_gateway;

async fn open_directory(
    config: &ShopfloorConfig,
) -> Result<(EmployeeDirectory, Arc<dyn PersistenceGateway>), ShopfloorError> {
    let gateway = open_gateway(config).await?;
    let audit = Arc::new(AuditLog::new(gateway.clone(), config.audit.retention));
    Ok((EmployeeDirectory::new(gateway.clone(), audit), gateway))
}

pub(crate) fn render_employee_table(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "  no employees\n".to_string();
    }
    let mut out = format!("  {:<12} {:<24} {}\n", "id", "name", "role");
    for employee in employees {
        out.push_str(&format!(
            "  {:<12} {:<24} {}\n",
            employee.id, employee.name, employee.role
        ));
    }
    out
}

/// Run `shopfloor employees list`.
pub async fn run_list(config: &ShopfloorConfig) -> Result<(), ShopfloorError> {
    let (directory, gateway) = open_directory(config).await?;
    print!("{}", render_employee_table(&directory.list().await?));
    gateway.shutdown().await
}

/// Run `shopfloor employees add`.
pub async fn run_add(config: &ShopfloorConfig, employee: Employee) -> Result<(), ShopfloorError> {
    let (directory, gateway) = open_directory(config).await?;
    directory
        .upsert(&config.session.user_name, &employee)
        .await?;
    println!("shopfloor: employee {} saved", employee.id);
    gateway.shutdown().await
}

/// Run `shopfloor employees remove`.
pub async fn run_remove(config: &ShopfloorConfig, id: &str) -> Result<(), ShopfloorError> {
    let (directory, gateway) = open_directory(config).await?;
    if directory.remove(&config.session.user_name, id).await? {
        println!("shopfloor: employee {id} removed");
    } else {
        println!("shopfloor: no employee with id {id}");
    }
    gateway.shutdown().await
}
