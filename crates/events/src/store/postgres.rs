//! [`MirrorStore`] backed by the `hrsync-db` repositories.

use async_trait::async_trait;
use hrsync_core::error::CoreError;
use hrsync_core::sync::SyncRecord;
use hrsync_core::topic::EntityKind;
use hrsync_core::types::DbId;
use hrsync_db::repositories::{
    CompanyCurrencyConfigRepo, CompanyLevelRepo, CurrencyRepo, DepartmentLeadershipRepo,
    DepartmentRepo, EmployeeRepo, GradeLevelRepo, HolidayRepo, JobTitleRepo,
    OvertimePaymentTierRepo, OvertimeRepo, PayPeriodRepo, PayrollCompanyRepo,
};
use hrsync_db::{sqlstate, DbPool};
use serde::Serialize;

use super::MirrorStore;
use crate::error::SyncError;

/// PostgreSQL mirror store. Cheap to clone (wraps the pool).
#[derive(Clone)]
pub struct PgMirrorStore {
    pool: DbPool,
}

impl PgMirrorStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn write(&self, record: &SyncRecord) -> Result<serde_json::Value, SyncError> {
        let pool = &self.pool;
        match record {
            SyncRecord::PayrollCompany(p) => to_json(PayrollCompanyRepo::upsert(pool, p).await?),
            SyncRecord::Employee(p) => to_json(EmployeeRepo::upsert(pool, p).await?),
            SyncRecord::CompanyLevel(p) => to_json(CompanyLevelRepo::upsert(pool, p).await?),
            SyncRecord::GradeLevel(p) => to_json(GradeLevelRepo::upsert(pool, p).await?),
            SyncRecord::Holiday(p) => to_json(HolidayRepo::upsert(pool, p).await?),
            SyncRecord::JobTitle(p) => to_json(JobTitleRepo::upsert(pool, p).await?),
            SyncRecord::CompanyCurrencyConfig(p) => {
                to_json(CompanyCurrencyConfigRepo::upsert(pool, p).await?)
            }
            SyncRecord::Currency(p) => to_json(CurrencyRepo::upsert(pool, p).await?),
            SyncRecord::PayPeriod(p) => to_json(PayPeriodRepo::upsert(pool, p).await?),
            SyncRecord::Overtime(p) => to_json(OvertimeRepo::upsert(pool, p).await?),
            SyncRecord::OvertimePaymentTier(p) => {
                to_json(OvertimePaymentTierRepo::upsert(pool, p).await?)
            }
            SyncRecord::Department(p) => to_json(DepartmentRepo::upsert(pool, p).await?),
            SyncRecord::DepartmentLeadership(p) => {
                to_json(DepartmentLeadershipRepo::upsert(pool, p).await?)
            }
        }
    }

    async fn remove(&self, kind: EntityKind, id: DbId) -> Result<bool, sqlx::Error> {
        let pool = &self.pool;
        match kind {
            EntityKind::PayrollCompany => PayrollCompanyRepo::delete(pool, id).await,
            EntityKind::Employee => EmployeeRepo::delete(pool, id).await,
            EntityKind::CompanyLevel => CompanyLevelRepo::delete(pool, id).await,
            EntityKind::GradeLevel => GradeLevelRepo::delete(pool, id).await,
            EntityKind::Holiday => HolidayRepo::delete(pool, id).await,
            EntityKind::JobTitle => JobTitleRepo::delete(pool, id).await,
            EntityKind::CompanyCurrencyConfig => CompanyCurrencyConfigRepo::delete(pool, id).await,
            EntityKind::Currency => CurrencyRepo::delete(pool, id).await,
            EntityKind::PayPeriod => PayPeriodRepo::delete(pool, id).await,
            EntityKind::Overtime => OvertimeRepo::delete(pool, id).await,
            EntityKind::OvertimePaymentTier => OvertimePaymentTierRepo::delete(pool, id).await,
            EntityKind::Department => DepartmentRepo::delete(pool, id).await,
            EntityKind::DepartmentLeadership => DepartmentLeadershipRepo::delete(pool, id).await,
        }
    }

    async fn find(
        &self,
        kind: EntityKind,
        id: DbId,
    ) -> Result<Option<serde_json::Value>, SyncError> {
        let pool = &self.pool;
        let found = match kind {
            EntityKind::PayrollCompany => PayrollCompanyRepo::find_by_id(pool, id)
                .await?
                .map(to_json),
            EntityKind::Employee => EmployeeRepo::find_by_id(pool, id).await?.map(to_json),
            EntityKind::CompanyLevel => CompanyLevelRepo::find_by_id(pool, id).await?.map(to_json),
            EntityKind::GradeLevel => GradeLevelRepo::find_by_id(pool, id).await?.map(to_json),
            EntityKind::Holiday => HolidayRepo::find_by_id(pool, id).await?.map(to_json),
            EntityKind::JobTitle => JobTitleRepo::find_by_id(pool, id).await?.map(to_json),
            EntityKind::CompanyCurrencyConfig => CompanyCurrencyConfigRepo::find_by_id(pool, id)
                .await?
                .map(to_json),
            EntityKind::Currency => CurrencyRepo::find_by_id(pool, id).await?.map(to_json),
            EntityKind::PayPeriod => PayPeriodRepo::find_by_id(pool, id).await?.map(to_json),
            EntityKind::Overtime => OvertimeRepo::find_by_id(pool, id).await?.map(to_json),
            EntityKind::OvertimePaymentTier => OvertimePaymentTierRepo::find_by_id(pool, id)
                .await?
                .map(to_json),
            EntityKind::Department => DepartmentRepo::find_by_id(pool, id).await?.map(to_json),
            EntityKind::DepartmentLeadership => DepartmentLeadershipRepo::find_by_id(pool, id)
                .await?
                .map(to_json),
        };
        found.transpose()
    }
}

#[async_trait]
impl MirrorStore for PgMirrorStore {
    async fn upsert(&self, record: &SyncRecord) -> Result<serde_json::Value, SyncError> {
        self.write(record).await.map_err(|e| match e {
            SyncError::Database(db_err) if sqlstate::is_foreign_key_violation(&db_err) => {
                CoreError::MissingReference {
                    entity: record.kind().name(),
                    id: record.id(),
                    detail: sqlstate::constraint(&db_err)
                        .unwrap_or("foreign key")
                        .to_string(),
                }
                .into()
            }
            other => other,
        })
    }

    async fn delete(&self, kind: EntityKind, id: DbId) -> Result<(), SyncError> {
        match self.remove(kind, id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CoreError::NotFound {
                entity: kind.name(),
                id,
            }
            .into()),
            Err(e) if sqlstate::is_foreign_key_violation(&e) => {
                tracing::debug!(
                    entity = %kind,
                    id,
                    constraint = sqlstate::constraint(&e).unwrap_or("unknown"),
                    "Delete blocked by foreign key",
                );
                Err(CoreError::RecordInUse {
                    entity: kind.name(),
                    id,
                }
                .into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn fetch(&self, kind: EntityKind, id: DbId) -> Result<serde_json::Value, SyncError> {
        self.find(kind, id).await?.ok_or_else(|| {
            CoreError::NotFound {
                entity: kind.name(),
                id,
            }
            .into()
        })
    }
}

fn to_json<T: Serialize>(row: T) -> Result<serde_json::Value, SyncError> {
    Ok(serde_json::to_value(row)?)
}
