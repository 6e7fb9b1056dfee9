//! Employee row types.
//!
//! An employee snapshot spans three tables: `employees`,
//! `employee_account_infos` and `employee_pay_infos`. [`EmployeeDetail`]
//! reassembles them for reads.

use hrsync_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: DbId,
    pub company_id: DbId,
    pub department_id: Option<DbId>,
    pub job_title_id: Option<DbId>,
    pub grade_level_id: Option<DbId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub employee_number: Option<String>,
    pub hire_date: Option<Date>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `employee_account_infos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAccountInfo {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub employee_id: DbId,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub is_primary: bool,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub updated_at: Timestamp,
}

/// A row from the `employee_pay_infos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayInfo {
    #[serde(skip_serializing)]
    pub employee_id: DbId,
    pub basic_pay: f64,
    pub currency_id: Option<DbId>,
    pub pay_frequency: String,
    #[serde(skip_serializing)]
    pub created_at: Timestamp,
    #[serde(skip_serializing)]
    pub updated_at: Timestamp,
}

/// An employee with the children mirrored from the same snapshot.
///
/// Serializes under the snapshot's own keys; children inherit the parent's
/// timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    #[serde(rename = "employeeAccountInfo")]
    pub account_infos: Vec<EmployeeAccountInfo>,
    #[serde(rename = "employeePayInfo")]
    pub pay_info: Option<EmployeePayInfo>,
}
