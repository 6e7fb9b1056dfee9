use std::sync::Arc;

use hrsync_core::sync::EmployeePayload;

use super::MirrorHandler;
use crate::registry::{RegistryBuilder, RegistryError};
use crate::store::MirrorStore;

/// Employees carry their bank accounts and pay info in the same snapshot, so
/// a single handler covers all three tables.
pub(super) fn register(
    builder: RegistryBuilder,
    store: &Arc<dyn MirrorStore>,
) -> Result<RegistryBuilder, RegistryError> {
    builder.register(MirrorHandler::<EmployeePayload>::new(store.clone()))
}
