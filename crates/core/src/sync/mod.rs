//! Event payloads for every mirrored entity.
//!
//! A payload is the full current-state snapshot the upstream system publishes
//! on `created` / `modified` topics. Deleted topics carry only
//! [`DeletedPayload`]. Payloads are decoded with serde (camelCase keys,
//! unknown keys ignored) and then validated before anything is written.

pub mod employee;
pub mod organization;
pub mod payroll;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::topic::EntityKind;
use crate::types::DbId;

pub use employee::{EmployeeAccountInfo, EmployeePayInfo, EmployeePayload};
pub use organization::{
    CompanyLevelPayload, DepartmentLeadershipPayload, DepartmentPayload, GradeLevelPayload,
    JobTitlePayload, PayrollCompanyPayload,
};
pub use payroll::{
    CompanyCurrencyConfigPayload, CurrencyPayload, HolidayPayload, OvertimePayload,
    OvertimePaymentTierPayload, PayPeriodPayload,
};

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// A foreign-key edge from a mirrored row to another mirrored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference {
    pub kind: EntityKind,
    pub id: DbId,
}

impl Reference {
    pub fn new(kind: EntityKind, id: DbId) -> Self {
        Self { kind, id }
    }

    /// Reference for an optional foreign key column.
    pub fn optional(kind: EntityKind, id: Option<DbId>) -> Option<Self> {
        id.map(|id| Self { kind, id })
    }
}

// ---------------------------------------------------------------------------
// SyncPayload
// ---------------------------------------------------------------------------

/// A decoded, validatable snapshot of one upstream entity.
pub trait SyncPayload:
    DeserializeOwned + Serialize + Validate + Send + Sync + 'static
{
    /// The entity this payload mirrors.
    const KIND: EntityKind;

    /// Upstream primary key.
    fn id(&self) -> DbId;

    /// Other mirrored rows this one points at.
    fn references(&self) -> Vec<Reference>;

    fn into_record(self) -> SyncRecord;
}

/// Payload of every `deleted` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeletedPayload {
    #[validate(range(min = 1))]
    pub id: DbId,
}

/// Decode and validate a raw event payload.
///
/// Both serde failures (missing or mistyped keys) and validation failures
/// surface as [`CoreError::Validation`].
pub fn decode_payload<P>(value: serde_json::Value) -> Result<P, CoreError>
where
    P: DeserializeOwned + Validate,
{
    let payload: P = serde_json::from_value(value)
        .map_err(|e| CoreError::Validation(format!("malformed payload: {e}")))?;
    payload
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    Ok(payload)
}

// ---------------------------------------------------------------------------
// SyncRecord
// ---------------------------------------------------------------------------

macro_rules! sync_records {
    ($($variant:ident($payload:ty)),+ $(,)?) => {
        /// Tagged union of every upsertable payload.
        #[derive(Debug, Clone, PartialEq)]
        pub enum SyncRecord {
            $($variant($payload),)+
        }

        impl SyncRecord {
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(SyncRecord::$variant(_) => EntityKind::$variant,)+
                }
            }

            pub fn id(&self) -> DbId {
                match self {
                    $(SyncRecord::$variant(p) => p.id,)+
                }
            }

            pub fn references(&self) -> Vec<Reference> {
                match self {
                    $(SyncRecord::$variant(p) => p.references(),)+
                }
            }

            /// Snapshot as camelCase JSON, the same shape the upstream publishes.
            pub fn to_json(&self) -> serde_json::Value {
                let value = match self {
                    $(SyncRecord::$variant(p) => serde_json::to_value(p),)+
                };
                // Payload types are plain structs with string keys.
                value.unwrap_or(serde_json::Value::Null)
            }
        }

        $(
            impl From<$payload> for SyncRecord {
                fn from(payload: $payload) -> Self {
                    SyncRecord::$variant(payload)
                }
            }
        )+
    };
}

sync_records! {
    PayrollCompany(PayrollCompanyPayload),
    Employee(EmployeePayload),
    CompanyLevel(CompanyLevelPayload),
    GradeLevel(GradeLevelPayload),
    Holiday(HolidayPayload),
    JobTitle(JobTitlePayload),
    CompanyCurrencyConfig(CompanyCurrencyConfigPayload),
    Currency(CurrencyPayload),
    PayPeriod(PayPeriodPayload),
    Overtime(OvertimePayload),
    OvertimePaymentTier(OvertimePaymentTierPayload),
    Department(DepartmentPayload),
    DepartmentLeadership(DepartmentLeadershipPayload),
}

/// Implements [`SyncPayload`] for a payload struct with an `id` field.
macro_rules! impl_sync_payload {
    ($payload:ty, $kind:ident, |$p:ident| $refs:expr) => {
        impl $crate::sync::SyncPayload for $payload {
            const KIND: $crate::topic::EntityKind = $crate::topic::EntityKind::$kind;

            fn id(&self) -> $crate::types::DbId {
                self.id
            }

            fn references(&self) -> Vec<$crate::sync::Reference> {
                let $p = self;
                $refs
            }

            fn into_record(self) -> $crate::sync::SyncRecord {
                $crate::sync::SyncRecord::$kind(self)
            }
        }
    };
}

pub(crate) use impl_sync_payload;
