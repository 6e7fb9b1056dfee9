//! Row types for payroll configuration tables.

use hrsync_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `currencies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub symbol: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `company_currency_configs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCurrencyConfig {
    pub id: DbId,
    pub company_id: DbId,
    pub currency_id: DbId,
    pub exchange_rate: f64,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `pay_periods` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriod {
    pub id: DbId,
    pub company_id: DbId,
    pub code: String,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub pay_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `holidays` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub date: Date,
    pub is_recurring: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `overtimes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overtime {
    pub id: DbId,
    pub company_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `overtime_payment_tiers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimePaymentTier {
    pub id: DbId,
    pub overtime_id: DbId,
    pub min_hours: f64,
    pub max_hours: Option<f64>,
    pub multiplier: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
