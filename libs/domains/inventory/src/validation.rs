//! Request checks that need the store, run before the service call.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::{InventoryError, InventoryResult};
use crate::repository::DepartmentLookup;

/// Reference checks against the department table.
///
/// Store constraints stay authoritative; these checks give the caller a
/// precise error before any write happens.
pub struct ReferenceCheck<L: DepartmentLookup> {
    lookup: Arc<L>,
}

impl<L: DepartmentLookup> Clone for ReferenceCheck<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
        }
    }
}

impl<L: DepartmentLookup> ReferenceCheck<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// `UnknownDepartment` unless the department exists.
    pub async fn department_exists(&self, id: Uuid) -> InventoryResult<()> {
        if !self.lookup.department_exists(id).await? {
            tracing::debug!(department_id = %id, "Rejected unknown department reference");
            return Err(InventoryError::UnknownDepartment(id));
        }
        Ok(())
    }

    /// Same as [`Self::department_exists`] for an optional reference.
    pub async fn optional_department_exists(&self, id: Option<Uuid>) -> InventoryResult<()> {
        match id {
            Some(id) => self.department_exists(id).await,
            None => Ok(()),
        }
    }

    /// `DuplicateDepartmentName` if any department already uses `name`.
    pub async fn department_name_free(&self, name: &str) -> InventoryResult<()> {
        if self.lookup.department_name_taken(name).await? {
            return Err(InventoryError::DuplicateDepartmentName(name.to_string()));
        }
        Ok(())
    }
}
