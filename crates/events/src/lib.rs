//! Upstream change-event consumption for the HR sync mirror.
//!
//! - [`HandlerRegistry`]: the topic dispatch table, filled by each entity
//!   group registering its `(topic, handler)` pairs.
//! - [`handlers`]: per-entity `created` / `modified` / `deleted` handlers.
//! - [`store`]: the [`MirrorStore`] seam with PostgreSQL and in-memory
//!   implementations.
//! - [`consumer`]: the runtime bridging a [`MessageSource`] (Kafka in
//!   production) to the registry.
//! - [`dead_letter`]: where messages that cannot be applied end up.

pub mod consumer;
pub mod dead_letter;
pub mod error;
pub mod handlers;
pub mod kafka;
pub mod registry;
pub mod store;

pub use consumer::source::{CommitOffset, InboundMessage, MessageSource};
pub use consumer::{
    ConsumerConfig, ConsumerRuntime, ConsumerStats, DispatchMode, RetryPolicy, StatsSnapshot,
};
pub use dead_letter::{DeadLetter, DeadLetterSink, MemoryDeadLetters, PgDeadLetterSink};
pub use error::SyncError;
pub use handlers::{default_registry, EntityHandler, HandlerOutcome, MirrorHandler};
pub use kafka::{KafkaConfig, KafkaSource, KafkaTls};
pub use registry::{Dispatch, HandlerRegistry, RegistryBuilder, RegistryError};
pub use store::{MemoryStore, MirrorStore, PgMirrorStore};
