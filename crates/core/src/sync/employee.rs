//! Employee payload, including the bank accounts and pay info the upstream
//! system embeds in the same snapshot.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{impl_sync_payload, Reference};
use crate::topic::EntityKind;
use crate::types::{Date, DbId};

/// `event.Employee.*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_single_primary_account"))]
pub struct EmployeePayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub company_id: DbId,
    pub department_id: Option<DbId>,
    pub job_title_id: Option<DbId>,
    pub grade_level_id: Option<DbId>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub employee_number: Option<String>,
    pub hire_date: Option<Date>,
    #[serde(default = "default_status")]
    #[validate(length(min = 1, max = 30))]
    pub status: String,
    #[serde(default)]
    #[validate(nested)]
    pub employee_account_info: Vec<EmployeeAccountInfo>,
    #[validate(nested)]
    pub employee_pay_info: Option<EmployeePayInfo>,
}

/// One bank account an employee is paid into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAccountInfo {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub bank_name: String,
    #[validate(length(min = 1, max = 255))]
    pub account_name: String,
    #[validate(length(min = 1, max = 34))]
    pub account_number: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Base pay for an employee. Exactly one per employee when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayInfo {
    #[validate(range(min = 0.0))]
    pub basic_pay: f64,
    pub currency_id: Option<DbId>,
    #[serde(default = "default_pay_frequency")]
    #[validate(length(min = 1, max = 20))]
    pub pay_frequency: String,
}

impl_sync_payload!(EmployeePayload, Employee, |p| {
    let mut refs = vec![Reference::new(EntityKind::PayrollCompany, p.company_id)];
    refs.extend(Reference::optional(EntityKind::Department, p.department_id));
    refs.extend(Reference::optional(EntityKind::JobTitle, p.job_title_id));
    refs.extend(Reference::optional(EntityKind::GradeLevel, p.grade_level_id));
    refs.extend(Reference::optional(
        EntityKind::Currency,
        p.employee_pay_info.as_ref().and_then(|pay| pay.currency_id),
    ));
    refs
});

fn validate_single_primary_account(employee: &EmployeePayload) -> Result<(), ValidationError> {
    let primaries = employee
        .employee_account_info
        .iter()
        .filter(|a| a.is_primary)
        .count();
    if primaries > 1 {
        let mut err = ValidationError::new("multiple_primary_accounts");
        err.message = Some("at most one account may be primary".into());
        return Err(err);
    }
    Ok(())
}

fn default_status() -> String {
    "active".to_string()
}

fn default_pay_frequency() -> String {
    "monthly".to_string()
}
