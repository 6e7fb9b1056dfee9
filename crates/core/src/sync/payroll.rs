//! Payroll configuration payloads: currencies, periods, holidays, overtime.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{impl_sync_payload, Reference};
use crate::topic::EntityKind;
use crate::types::{Date, DbId};

/// `event.Currency.*` (never deleted upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    /// ISO 4217 code, e.g. `"NGN"`.
    #[validate(length(equal = 3))]
    pub code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 10))]
    pub symbol: Option<String>,
}

impl_sync_payload!(CurrencyPayload, Currency, |_p| Vec::new());

/// `event.CompanyCurrencyConfig.*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCurrencyConfigPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub company_id: DbId,
    #[validate(range(min = 1))]
    pub currency_id: DbId,
    #[validate(range(exclusive_min = 0.0))]
    pub exchange_rate: f64,
    #[serde(default)]
    pub is_default: bool,
}

impl_sync_payload!(CompanyCurrencyConfigPayload, CompanyCurrencyConfig, |p| vec![
    Reference::new(EntityKind::PayrollCompany, p.company_id),
    Reference::new(EntityKind::Currency, p.currency_id),
]);

/// `event.PayPeriod.*` (never deleted upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_pay_period_dates"))]
pub struct PayPeriodPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub company_id: DbId,
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub pay_date: Option<Date>,
}

impl_sync_payload!(PayPeriodPayload, PayPeriod, |p| vec![Reference::new(
    EntityKind::PayrollCompany,
    p.company_id
)]);

fn validate_pay_period_dates(period: &PayPeriodPayload) -> Result<(), ValidationError> {
    if period.end_date < period.start_date {
        let mut err = ValidationError::new("pay_period_range");
        err.message = Some("endDate must not precede startDate".into());
        return Err(err);
    }
    Ok(())
}

/// `event.Holiday.*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HolidayPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub company_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub date: Date,
    #[serde(default)]
    pub is_recurring: bool,
}

impl_sync_payload!(HolidayPayload, Holiday, |p| vec![Reference::new(
    EntityKind::PayrollCompany,
    p.company_id
)]);

/// `event.Overtime.*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OvertimePayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub company_id: DbId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl_sync_payload!(OvertimePayload, Overtime, |p| vec![Reference::new(
    EntityKind::PayrollCompany,
    p.company_id
)]);

/// `event.OvertimePaymentTier.*`
///
/// Hours worked in `[minHours, maxHours)` are paid at `multiplier` times the
/// base hourly rate; an absent `maxHours` makes the tier open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_tier_bounds"))]
pub struct OvertimePaymentTierPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub overtime_id: DbId,
    #[validate(range(min = 0.0))]
    pub min_hours: f64,
    pub max_hours: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub multiplier: f64,
}

impl_sync_payload!(OvertimePaymentTierPayload, OvertimePaymentTier, |p| vec![
    Reference::new(EntityKind::Overtime, p.overtime_id)
]);

fn validate_tier_bounds(tier: &OvertimePaymentTierPayload) -> Result<(), ValidationError> {
    match tier.max_hours {
        Some(max) if max <= tier.min_hours => {
            let mut err = ValidationError::new("overtime_tier_bounds");
            err.message = Some("maxHours must exceed minHours".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

fn default_true() -> bool {
    true
}
