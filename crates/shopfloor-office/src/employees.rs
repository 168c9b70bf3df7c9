// SPDX-FileCopyrightText: 2026 Shopfloor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master employee collection.
//!
//! Employees are not slot-owned, so writes here skip capacity accounting.
//! Every change is recorded in the EMPLOYEE audit log.

use std::sync::Arc;

use shopfloor_core::{
    AuditCategory, DatasetKey, Employee, PersistenceGateway, Record, ShopfloorError,
};
use tracing::{info, warn};

use crate::audit::AuditLog;

/// Reads and edits the employee collection.
pub struct EmployeeDirectory {
    gateway: Arc<dyn PersistenceGateway>,
    audit: Arc<AuditLog>,
}

impl EmployeeDirectory {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, audit: Arc<AuditLog>) -> Self {
        Self { gateway, audit }
    }

    /// Every employee, in stored order. Malformed records are skipped.
    pub async fn list(&self) -> Result<Vec<Employee>, ShopfloorError> {
        let records = self.gateway.read_dataset(&DatasetKey::Employees).await?;
        Ok(records
            .iter()
            .filter_map(|record| match record.decode::<Employee>() {
                Ok(employee) => Some(employee),
                Err(e) => {
                    warn!(record_id = %record.id, error = %e, "skipping malformed employee");
                    None
                }
            })
            .collect())
    }

    /// Add an employee, or replace the one with the same id.
    pub async fn upsert(&self, actor: &str, employee: &Employee) -> Result<(), ShopfloorError> {
        if employee.id.trim().is_empty() || employee.name.trim().is_empty() {
            return Err(ShopfloorError::InvalidInput(
                "employee id and name must not be empty".to_string(),
            ));
        }
        let record = Record::encode(&employee.id, employee).map_err(ShopfloorError::storage)?;
        self.gateway
            .append_or_upsert(&DatasetKey::Employees, record)
            .await?;
        info!(employee_id = %employee.id, "employee saved");
        self.audit
            .record(
                AuditCategory::Employee,
                actor,
                "upsert",
                format!("{} ({})", employee.id, employee.name),
            )
            .await?;
        Ok(())
    }

    /// Remove an employee. Returns whether one was removed.
    pub async fn remove(&self, actor: &str, employee_id: &str) -> Result<bool, ShopfloorError> {
        let removed = self
            .gateway
            .delete_record(&DatasetKey::Employees, employee_id)
            .await?;
        if removed {
            info!(employee_id, "employee removed");
            self.audit
                .record(AuditCategory::Employee, actor, "remove", employee_id)
                .await?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfloor_storage::MemoryGateway;

    fn directory() -> (EmployeeDirectory, Arc<AuditLog>) {
        let gw: Arc<dyn PersistenceGateway> = Arc::new(MemoryGateway::new());
        let audit = Arc::new(AuditLog::new(gw.clone(), 10));
        (EmployeeDirectory::new(gw, audit.clone()), audit)
    }

    fn employee(id: &str, name: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: name.to_string(),
            role: "QC".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_by_id_and_is_audited() {
        let (dir, audit) = directory();
        dir.upsert("Lan", &employee("e1", "Minh")).await.unwrap();
        dir.upsert("Lan", &employee("e1", "Minh Trần")).await.unwrap();

        let all = dir.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Minh Trần");
        assert_eq!(audit.entries(AuditCategory::Employee).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (dir, _) = directory();
        let err = dir.upsert("Lan", &employee("e1", " ")).await.unwrap_err();
        assert!(matches!(err, ShopfloorError::InvalidInput(_)));
        assert!(dir.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn removing_unknown_employee_is_a_no_op() {
        let (dir, audit) = directory();
        dir.upsert("Lan", &employee("e1", "Minh")).await.unwrap();
        assert!(!dir.remove("Lan", "e9").await.unwrap());
        assert!(dir.remove("Lan", "e1").await.unwrap());
        assert!(dir.list().await.unwrap().is_empty());
        assert_eq!(audit.entries(AuditCategory::Employee).await.unwrap().len(), 2);
    }
}
