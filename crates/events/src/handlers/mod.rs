//! Per-entity event handlers.
//!
//! Every mirrored entity is served by a [`MirrorHandler`] parameterised over
//! its payload type. `created` and `modified` both decode, validate and upsert
//! the snapshot; `deleted` removes the row by id.

mod employee;
mod organization;
mod payroll;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use hrsync_core::error::CoreError;
use hrsync_core::sync::{decode_payload, DeletedPayload, SyncPayload};
use hrsync_core::topic::{EntityKind, Topic, Verb};
use hrsync_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::error::SyncError;
use crate::registry::{HandlerRegistry, RegistryError};
use crate::store::MirrorStore;

// ---------------------------------------------------------------------------
// EntityHandler
// ---------------------------------------------------------------------------

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HandlerOutcome {
    /// The record as persisted.
    Upserted { record: serde_json::Value },
    /// `existed` is false when the row was already gone.
    Deleted { id: DbId, existed: bool },
}

/// Applies the events of one entity to the mirror.
#[async_trait]
pub trait EntityHandler: Send + Sync {
    fn entity(&self) -> EntityKind;

    /// Verbs this handler accepts. Defaults to every verb the entity publishes.
    fn verbs(&self) -> &'static [Verb] {
        self.entity().verbs()
    }

    async fn handle(
        &self,
        verb: Verb,
        payload: serde_json::Value,
    ) -> Result<HandlerOutcome, SyncError>;
}

// ---------------------------------------------------------------------------
// MirrorHandler
// ---------------------------------------------------------------------------

/// Generic handler writing payloads of type `P` through a [`MirrorStore`].
pub struct MirrorHandler<P> {
    store: Arc<dyn MirrorStore>,
    _payload: PhantomData<fn() -> P>,
}

impl<P: SyncPayload> MirrorHandler<P> {
    pub fn new(store: Arc<dyn MirrorStore>) -> Self {
        Self {
            store,
            _payload: PhantomData,
        }
    }

    /// Create-or-update from a `created` event.
    pub async fn handle_created(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, SyncError> {
        self.upsert(Verb::Created, payload).await
    }

    /// Create-or-update from a `modified` event. Identical to
    /// [`handle_created`](Self::handle_created).
    pub async fn handle_modified(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, SyncError> {
        self.upsert(Verb::Modified, payload).await
    }

    /// Delete by the `id` carried in the payload.
    ///
    /// A row that is already absent counts as deleted so a redelivered event
    /// settles cleanly. A delete blocked by a dependent row fails with
    /// [`CoreError::RecordInUse`] and leaves the row in place.
    pub async fn handle_deleted(
        &self,
        payload: serde_json::Value,
    ) -> Result<HandlerOutcome, SyncError> {
        let DeletedPayload { id } = self.decode(Verb::Deleted, payload)?;
        let entity = P::KIND.name();

        match self.store.delete(P::KIND, id).await {
            Ok(()) => {
                tracing::debug!(entity, id, "Deleted mirrored record");
                Ok(HandlerOutcome::Deleted { id, existed: true })
            }
            Err(SyncError::Core(CoreError::NotFound { .. })) => {
                tracing::debug!(entity, id, "Delete for absent record, nothing to do");
                Ok(HandlerOutcome::Deleted { id, existed: false })
            }
            Err(e) => {
                tracing::error!(entity, id, error = %e, "Failed to delete mirrored record");
                Err(e)
            }
        }
    }

    async fn upsert(
        &self,
        verb: Verb,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, SyncError> {
        let payload: P = self.decode(verb, payload)?;
        let id = payload.id();
        let record = payload.into_record();

        match self.store.upsert(&record).await {
            Ok(persisted) => {
                tracing::debug!(entity = P::KIND.name(), id, %verb, "Upserted mirrored record");
                Ok(persisted)
            }
            Err(e) => {
                tracing::error!(
                    entity = P::KIND.name(),
                    id,
                    %verb,
                    error = %e,
                    "Failed to upsert mirrored record"
                );
                Err(e)
            }
        }
    }

    fn decode<T>(&self, verb: Verb, payload: serde_json::Value) -> Result<T, SyncError>
    where
        T: DeserializeOwned + Validate,
    {
        decode_payload(payload).map_err(|e| {
            let topic = Topic::new(P::KIND, verb).to_string();
            let reason = match e {
                CoreError::Validation(reason) => reason,
                other => other.to_string(),
            };
            tracing::warn!(%topic, %reason, "Rejected invalid payload");
            SyncError::InvalidPayload { topic, reason }
        })
    }
}

#[async_trait]
impl<P: SyncPayload> EntityHandler for MirrorHandler<P> {
    fn entity(&self) -> EntityKind {
        P::KIND
    }

    async fn handle(
        &self,
        verb: Verb,
        payload: serde_json::Value,
    ) -> Result<HandlerOutcome, SyncError> {
        match verb {
            Verb::Created => self
                .handle_created(payload)
                .await
                .map(|record| HandlerOutcome::Upserted { record }),
            Verb::Modified => self
                .handle_modified(payload)
                .await
                .map(|record| HandlerOutcome::Upserted { record }),
            Verb::Deleted if P::KIND.supports(Verb::Deleted) => self.handle_deleted(payload).await,
            Verb::Deleted => Err(SyncError::InvalidPayload {
                topic: Topic::new(P::KIND, verb).to_string(),
                reason: format!("{} is never deleted upstream", P::KIND),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registry with a [`MirrorHandler`] for every mirrored entity.
pub fn default_registry(store: Arc<dyn MirrorStore>) -> Result<HandlerRegistry, RegistryError> {
    let builder = HandlerRegistry::builder();
    let builder = organization::register(builder, &store)?;
    let builder = payroll::register(builder, &store)?;
    let builder = employee::register(builder, &store)?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use hrsync_core::sync::{DepartmentPayload, PayrollCompanyPayload, SyncRecord};
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    async fn store_with_company() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert(&SyncRecord::from(PayrollCompanyPayload {
                id: 1,
                name: "Acme".into(),
                email: None,
                country_code: None,
                is_active: true,
            }))
            .await
            .unwrap();
        store
    }

    fn hr_department() -> serde_json::Value {
        json!({ "id": 42, "code": "HR", "name": "Human Resources", "companyId": 1 })
    }

    #[tokio::test]
    async fn upsert_twice_equals_once() {
        let store = store_with_company().await;
        let handler = MirrorHandler::<DepartmentPayload>::new(store.clone());

        let first = handler.handle_created(hr_department()).await.unwrap();
        let second = handler.handle_created(hr_department()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.fetch(EntityKind::Department, 42).await.unwrap(), first);
    }

    #[tokio::test]
    async fn created_and_modified_store_the_same_state() {
        let via_created = store_with_company().await;
        let via_modified = store_with_company().await;

        MirrorHandler::<DepartmentPayload>::new(via_created.clone())
            .handle_created(hr_department())
            .await
            .unwrap();
        MirrorHandler::<DepartmentPayload>::new(via_modified.clone())
            .handle_modified(hr_department())
            .await
            .unwrap();

        assert_eq!(
            via_created.get(EntityKind::Department, 42).await,
            via_modified.get(EntityKind::Department, 42).await
        );
    }

    #[tokio::test]
    async fn modified_overwrites_every_field() {
        let store = store_with_company().await;
        let handler = MirrorHandler::<DepartmentPayload>::new(store.clone());
        handler.handle_created(hr_department()).await.unwrap();

        let renamed = json!({ "id": 42, "code": "PPL", "name": "People", "companyId": 1 });
        let record = handler.handle_modified(renamed).await.unwrap();

        assert_eq!(record["code"], "PPL");
        assert_eq!(record["name"], "People");
    }

    #[tokio::test]
    async fn delete_then_fetch_is_not_found() {
        let store = store_with_company().await;
        let handler = MirrorHandler::<DepartmentPayload>::new(store.clone());
        handler.handle_created(hr_department()).await.unwrap();

        let outcome = handler.handle_deleted(json!({ "id": 42 })).await.unwrap();
        assert_eq!(outcome, HandlerOutcome::Deleted { id: 42, existed: true });

        let err = store.fetch(EntityKind::Department, 42).await.unwrap_err();
        assert_matches!(err, SyncError::Core(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_of_absent_record_settles() {
        let store = Arc::new(MemoryStore::new());
        let handler = MirrorHandler::<DepartmentPayload>::new(store);
        let outcome = handler.handle_deleted(json!({ "id": 42 })).await.unwrap();
        assert_eq!(outcome, HandlerOutcome::Deleted { id: 42, existed: false });
    }

    #[tokio::test]
    async fn referenced_department_cannot_be_deleted() {
        let store = store_with_company().await;
        let registry = default_registry(store.clone()).unwrap();

        registry
            .dispatch("event.Department.created", hr_department())
            .await
            .unwrap();
        registry
            .dispatch(
                "event.Employee.created",
                json!({ "id": 9, "companyId": 1, "departmentId": 42,
                        "firstName": "Ada", "lastName": "Obi" }),
            )
            .await
            .unwrap();
        registry
            .dispatch(
                "event.DepartmentLeadership.created",
                json!({ "id": 5, "departmentId": 42, "employeeId": 9 }),
            )
            .await
            .unwrap();

        let before = store.get(EntityKind::Department, 42).await;
        let err = registry
            .dispatch("event.Department.deleted", json!({ "id": 42 }))
            .await
            .unwrap_err();

        assert_matches!(
            err,
            SyncError::Core(CoreError::RecordInUse { entity: "Department", id: 42 })
        );
        assert_eq!(store.get(EntityKind::Department, 42).await, before);
    }

    #[tokio::test]
    async fn invalid_payload_is_rejected_before_any_write() {
        let store = store_with_company().await;
        let handler = MirrorHandler::<DepartmentPayload>::new(store.clone());

        let err = handler
            .handle_created(json!({ "id": 42, "name": "No code", "companyId": 1 }))
            .await
            .unwrap_err();

        assert_matches!(
            err,
            SyncError::InvalidPayload { ref topic, .. } if topic == "event.Department.created"
        );
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn missing_parent_surfaces_as_missing_reference() {
        let store = Arc::new(MemoryStore::new());
        let handler = MirrorHandler::<DepartmentPayload>::new(store);
        let err = handler.handle_created(hr_department()).await.unwrap_err();
        assert_matches!(err, SyncError::Core(CoreError::MissingReference { id: 42, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn currency_has_no_delete() {
        let store = Arc::new(MemoryStore::new());
        let handler = MirrorHandler::<hrsync_core::sync::CurrencyPayload>::new(store);
        assert_eq!(handler.verbs(), &[Verb::Created, Verb::Modified]);

        let err = handler
            .handle(Verb::Deleted, json!({ "id": 1 }))
            .await
            .unwrap_err();
        assert_matches!(err, SyncError::InvalidPayload { .. });
    }
}
