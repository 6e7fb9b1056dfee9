//! Organizational-tree payloads: companies, levels, departments, titles.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{impl_sync_payload, Reference};
use crate::topic::EntityKind;
use crate::types::DbId;

/// `event.PayrollCompany.*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PayrollCompanyPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(equal = 2))]
    pub country_code: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl_sync_payload!(PayrollCompanyPayload, PayrollCompany, |_p| Vec::new());

/// `event.CompanyLevel.*` (never deleted upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyLevelPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub company_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0))]
    pub level: i32,
}

impl_sync_payload!(CompanyLevelPayload, CompanyLevel, |p| vec![Reference::new(
    EntityKind::PayrollCompany,
    p.company_id
)]);

/// `event.GradeLevel.*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradeLevelPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub company_id: DbId,
    pub company_level_id: Option<DbId>,
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
}

impl_sync_payload!(GradeLevelPayload, GradeLevel, |p| {
    let mut refs = vec![Reference::new(EntityKind::PayrollCompany, p.company_id)];
    refs.extend(Reference::optional(
        EntityKind::CompanyLevel,
        p.company_level_id,
    ));
    refs
});

/// `event.JobTitle.*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobTitlePayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub company_id: DbId,
    #[validate(length(max = 50))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
}

impl_sync_payload!(JobTitlePayload, JobTitle, |p| vec![Reference::new(
    EntityKind::PayrollCompany,
    p.company_id
)]);

/// `event.Department.*`
///
/// `parentId` links sub-departments into a tree within one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub company_id: DbId,
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub parent_id: Option<DbId>,
}

impl_sync_payload!(DepartmentPayload, Department, |p| {
    let mut refs = vec![Reference::new(EntityKind::PayrollCompany, p.company_id)];
    // A department naming itself as parent is satisfied by its own row.
    refs.extend(
        Reference::optional(EntityKind::Department, p.parent_id).filter(|r| r.id != p.id),
    );
    refs
});

/// `event.DepartmentLeadership.*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentLeadershipPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub department_id: DbId,
    #[validate(range(min = 1))]
    pub employee_id: DbId,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub rank: i32,
}

impl_sync_payload!(DepartmentLeadershipPayload, DepartmentLeadership, |p| vec![
    Reference::new(EntityKind::Department, p.department_id),
    Reference::new(EntityKind::Employee, p.employee_id),
]);

fn default_true() -> bool {
    true
}
