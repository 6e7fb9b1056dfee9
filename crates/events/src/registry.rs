//! Topic dispatch table.
//!
//! Built once at startup by each entity group registering its handlers, then
//! shared read-only (behind `Arc`) between the consumer and the API.

use std::collections::HashMap;
use std::sync::Arc;

use hrsync_core::topic::{EntityKind, Topic, Verb};

use crate::error::SyncError;
use crate::handlers::{EntityHandler, HandlerOutcome};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Topic registered twice: {0}")]
    DuplicateTopic(String),

    #[error("{entity} does not publish {verb} events")]
    UnsupportedVerb { entity: EntityKind, verb: Verb },
}

/// What [`HandlerRegistry::dispatch`] did with a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Handled(HandlerOutcome),
    /// No handler is registered for the topic.
    Ignored,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RegistryBuilder {
    routes: HashMap<Topic, Arc<dyn EntityHandler>>,
}

impl RegistryBuilder {
    /// Route every verb the handler accepts to it.
    pub fn register<H>(self, handler: H) -> Result<Self, RegistryError>
    where
        H: EntityHandler + 'static,
    {
        self.register_shared(Arc::new(handler))
    }

    pub fn register_shared(
        mut self,
        handler: Arc<dyn EntityHandler>,
    ) -> Result<Self, RegistryError> {
        let entity = handler.entity();
        for &verb in handler.verbs() {
            if !entity.supports(verb) {
                return Err(RegistryError::UnsupportedVerb { entity, verb });
            }
            let topic = Topic::new(entity, verb);
            if self.routes.contains_key(&topic) {
                return Err(RegistryError::DuplicateTopic(topic.to_string()));
            }
            self.routes.insert(topic, Arc::clone(&handler));
        }
        Ok(self)
    }

    pub fn build(self) -> HandlerRegistry {
        tracing::debug!(topics = self.routes.len(), "Handler registry built");
        HandlerRegistry {
            routes: self.routes,
        }
    }
}

// ---------------------------------------------------------------------------
// HandlerRegistry
// ---------------------------------------------------------------------------

pub struct HandlerRegistry {
    routes: HashMap<Topic, Arc<dyn EntityHandler>>,
}

impl HandlerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Every registered topic, sorted.
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.routes.keys().map(Topic::to_string).collect();
        topics.sort();
        topics
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.route(topic).is_some()
    }

    /// Parsed form of a registered topic.
    pub fn route(&self, topic: &str) -> Option<Topic> {
        Topic::parse(topic).filter(|parsed| self.routes.contains_key(parsed))
    }

    /// Hand `payload` to the handler registered for `topic`.
    ///
    /// Topics without a handler are [`Dispatch::Ignored`]: no handler runs and
    /// no error is raised.
    pub async fn dispatch(
        &self,
        topic: &str,
        payload: serde_json::Value,
    ) -> Result<Dispatch, SyncError> {
        let Some((topic, handler)) = Topic::parse(topic)
            .and_then(|parsed| self.routes.get_key_value(&parsed))
        else {
            return Ok(Dispatch::Ignored);
        };
        handler
            .handle(topic.verb, payload)
            .await
            .map(Dispatch::Handled)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::handlers::default_registry;
    use crate::store::MemoryStore;

    #[derive(Default)]
    struct CountingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EntityHandler for CountingHandler {
        fn entity(&self) -> EntityKind {
            EntityKind::Holiday
        }

        async fn handle(
            &self,
            verb: Verb,
            payload: serde_json::Value,
        ) -> Result<HandlerOutcome, SyncError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HandlerOutcome::Upserted {
                record: json!({ "verb": verb.as_str(), "payload": payload }),
            })
        }
    }

    struct DeletingCurrency;

    #[async_trait]
    impl EntityHandler for DeletingCurrency {
        fn entity(&self) -> EntityKind {
            EntityKind::Currency
        }

        fn verbs(&self) -> &'static [Verb] {
            &[Verb::Deleted]
        }

        async fn handle(&self, _: Verb, _: serde_json::Value) -> Result<HandlerOutcome, SyncError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn unknown_topic_is_ignored_without_calling_a_handler() {
        let handler = Arc::new(CountingHandler::default());
        let registry = HandlerRegistry::builder()
            .register_shared(handler.clone())
            .unwrap()
            .build();

        let unknown = [
            "event.Holiday.archived",
            "event.Holiday.created.v2",
            "event.Payslip.created",
            "",
            "misc",
        ];
        for topic in unknown {
            let result = registry.dispatch(topic, json!({ "id": 1 })).await.unwrap();
            assert_eq!(result, Dispatch::Ignored);
        }
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);

        let handled = registry
            .dispatch("event.Holiday.deleted", json!({ "id": 1 }))
            .await
            .unwrap();
        assert_matches!(
            handled,
            Dispatch::Handled(HandlerOutcome::Upserted { ref record })
                if record["verb"] == "deleted"
        );
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let result = HandlerRegistry::builder()
            .register(CountingHandler::default())
            .unwrap()
            .register(CountingHandler::default());
        assert_matches!(
            result.err(),
            Some(RegistryError::DuplicateTopic(ref topic)) if topic == "event.Holiday.created"
        );
    }

    #[test]
    fn verbs_the_entity_never_publishes_are_rejected() {
        let result = HandlerRegistry::builder().register(DeletingCurrency);
        assert_matches!(
            result.err(),
            Some(RegistryError::UnsupportedVerb {
                entity: EntityKind::Currency,
                verb: Verb::Deleted
            })
        );
    }

    #[test]
    fn default_registry_covers_every_published_topic() {
        let registry = default_registry(Arc::new(MemoryStore::new())).unwrap();
        let topics = registry.topics();

        assert_eq!(topics.len(), 36);
        assert!(topics.windows(2).all(|w| w[0] < w[1]));
        for kind in EntityKind::ALL {
            for topic in Topic::all_for(kind) {
                assert!(registry.contains(&topic.to_string()), "{topic}");
                assert_eq!(registry.route(&topic.to_string()), Some(topic));
            }
        }
        assert!(!registry.contains("event.Currency.deleted"));
    }
}
