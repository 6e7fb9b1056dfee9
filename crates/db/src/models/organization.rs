//! Row types for the organizational tree: companies, levels, departments,
//! department leadership, job titles and grade levels.

use hrsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `payroll_companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollCompany {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub country_code: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `company_levels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyLevel {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub level: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `grade_levels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeLevel {
    pub id: DbId,
    pub company_id: DbId,
    pub company_level_id: Option<DbId>,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `job_titles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTitle {
    pub id: DbId,
    pub company_id: DbId,
    pub code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DbId,
    pub company_id: DbId,
    pub code: String,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `department_leaderships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentLeadership {
    pub id: DbId,
    pub department_id: DbId,
    pub employee_id: DbId,
    pub rank: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
