//! Companies, levels, grades, job titles and departments.

use std::sync::Arc;

use hrsync_core::sync::{
    CompanyLevelPayload, DepartmentLeadershipPayload, DepartmentPayload, GradeLevelPayload,
    JobTitlePayload, PayrollCompanyPayload,
};

use super::MirrorHandler;
use crate::registry::{RegistryBuilder, RegistryError};
use crate::store::MirrorStore;

pub(super) fn register(
    builder: RegistryBuilder,
    store: &Arc<dyn MirrorStore>,
) -> Result<RegistryBuilder, RegistryError> {
    builder
        .register(MirrorHandler::<PayrollCompanyPayload>::new(store.clone()))?
        .register(MirrorHandler::<CompanyLevelPayload>::new(store.clone()))?
        .register(MirrorHandler::<GradeLevelPayload>::new(store.clone()))?
        .register(MirrorHandler::<JobTitlePayload>::new(store.clone()))?
        .register(MirrorHandler::<DepartmentPayload>::new(store.clone()))?
        .register(MirrorHandler::<DepartmentLeadershipPayload>::new(store.clone()))
}
