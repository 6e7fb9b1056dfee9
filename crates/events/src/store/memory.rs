//! In-process [`MirrorStore`].
//!
//! Keeps records in a map and enforces the same referential rules as the
//! PostgreSQL schema using [`SyncRecord::references`]. Records come back in
//! the same camelCase shape as the PostgreSQL rows, `createdAt` and
//! `updatedAt` included. Used by the consumer tests and for local dry runs
//! without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use hrsync_core::error::CoreError;
use hrsync_core::sync::SyncRecord;
use hrsync_core::topic::EntityKind;
use hrsync_core::types::{DbId, Timestamp};
use serde_json::json;
use tokio::sync::RwLock;

use super::MirrorStore;
use crate::error::SyncError;

struct Entry {
    record: SyncRecord,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Entry {
    fn to_json(&self) -> serde_json::Value {
        let mut value = self.record.to_json();
        if let Some(fields) = value.as_object_mut() {
            fields.insert("createdAt".into(), json!(self.created_at));
            fields.insert("updatedAt".into(), json!(self.updated_at));
        }
        value
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<(EntityKind, DbId), Entry>>,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored record, if any.
    pub async fn get(&self, kind: EntityKind, id: DbId) -> Option<SyncRecord> {
        self.records
            .read()
            .await
            .get(&(kind, id))
            .map(|entry| entry.record.clone())
    }

    /// Number of stored records across all entities.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of successful upserts and deletes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MirrorStore for MemoryStore {
    async fn upsert(&self, record: &SyncRecord) -> Result<serde_json::Value, SyncError> {
        let mut records = self.records.write().await;

        if let Some(missing) = record
            .references()
            .into_iter()
            .find(|r| !records.contains_key(&(r.kind, r.id)))
        {
            return Err(CoreError::MissingReference {
                entity: record.kind().name(),
                id: record.id(),
                detail: format!("{} {} is not mirrored", missing.kind, missing.id),
            }
            .into());
        }

        let now = Utc::now();
        let created_at = records
            .get(&(record.kind(), record.id()))
            .map_or(now, |existing| existing.created_at);
        let entry = Entry {
            record: record.clone(),
            created_at,
            updated_at: now,
        };
        let json = entry.to_json();
        records.insert((record.kind(), record.id()), entry);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(json)
    }

    async fn delete(&self, kind: EntityKind, id: DbId) -> Result<(), SyncError> {
        let mut records = self.records.write().await;

        if !records.contains_key(&(kind, id)) {
            return Err(CoreError::NotFound {
                entity: kind.name(),
                id,
            }
            .into());
        }

        let referenced = records.iter().any(|(&key, other)| {
            key != (kind, id)
                && other
                    .record
                    .references()
                    .iter()
                    .any(|r| r.kind == kind && r.id == id)
        });
        if referenced {
            return Err(CoreError::RecordInUse {
                entity: kind.name(),
                id,
            }
            .into());
        }

        records.remove(&(kind, id));
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn fetch(&self, kind: EntityKind, id: DbId) -> Result<serde_json::Value, SyncError> {
        self.records
            .read()
            .await
            .get(&(kind, id))
            .map(Entry::to_json)
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: kind.name(),
                    id,
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use hrsync_core::sync::{DepartmentLeadershipPayload, DepartmentPayload, PayrollCompanyPayload};

    use super::*;

    fn company(id: DbId) -> SyncRecord {
        PayrollCompanyPayload {
            id,
            name: "Acme".into(),
            email: None,
            country_code: None,
            is_active: true,
        }
        .into()
    }

    fn department(id: DbId, company_id: DbId) -> SyncRecord {
        DepartmentPayload {
            id,
            company_id,
            code: "HR".into(),
            name: "Human Resources".into(),
            parent_id: None,
        }
        .into()
    }

    #[tokio::test]
    async fn upsert_requires_referenced_rows() {
        let store = MemoryStore::new();
        let err = store.upsert(&department(42, 1)).await.unwrap_err();
        assert_matches!(
            err,
            SyncError::Core(CoreError::MissingReference { entity: "Department", id: 42, .. })
        );
        assert!(store.is_empty().await);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn delete_blocked_while_referenced() {
        let store = MemoryStore::new();
        store.upsert(&company(1)).await.unwrap();
        store.upsert(&department(42, 1)).await.unwrap();

        let err = store
            .delete(EntityKind::PayrollCompany, 1)
            .await
            .unwrap_err();
        assert_matches!(err, SyncError::Core(CoreError::RecordInUse { id: 1, .. }));
        assert!(store.get(EntityKind::PayrollCompany, 1).await.is_some());

        store.delete(EntityKind::Department, 42).await.unwrap();
        store.delete(EntityKind::PayrollCompany, 1).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn leadership_blocks_department_delete() {
        let store = MemoryStore::new();
        store.upsert(&company(1)).await.unwrap();
        store.upsert(&department(42, 1)).await.unwrap();
        store
            .upsert(
                &hrsync_core::sync::EmployeePayload {
                    id: 9,
                    company_id: 1,
                    department_id: None,
                    job_title_id: None,
                    grade_level_id: None,
                    first_name: "Ada".into(),
                    last_name: "Obi".into(),
                    email: None,
                    employee_number: None,
                    hire_date: None,
                    status: "active".into(),
                    employee_account_info: Vec::new(),
                    employee_pay_info: None,
                }
                .into(),
            )
            .await
            .unwrap();
        store
            .upsert(
                &DepartmentLeadershipPayload {
                    id: 5,
                    department_id: 42,
                    employee_id: 9,
                    rank: 1,
                }
                .into(),
            )
            .await
            .unwrap();

        let err = store.delete(EntityKind::Department, 42).await.unwrap_err();
        assert_matches!(err, SyncError::Core(CoreError::RecordInUse { entity: "Department", .. }));
    }

    #[tokio::test]
    async fn records_use_the_row_shape() {
        let store = MemoryStore::new();
        store.upsert(&company(1)).await.unwrap();
        let first = store.upsert(&department(42, 1)).await.unwrap();
        assert_eq!(first["companyId"], 1);
        assert!(first["parentId"].is_null());
        assert!(first.get("company_id").is_none());

        let again = store.upsert(&department(42, 1)).await.unwrap();
        assert_eq!(again["createdAt"], first["createdAt"]);
        assert_eq!(store.fetch(EntityKind::Department, 42).await.unwrap(), again);
    }

    #[tokio::test]
    async fn fetch_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.fetch(EntityKind::Holiday, 3).await.unwrap_err();
        assert_matches!(err, SyncError::Core(CoreError::NotFound { entity: "Holiday", id: 3 }));
    }
}
