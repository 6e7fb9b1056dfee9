//! The consumer runtime.
//!
//! [`ConsumerRuntime`] subscribes a [`MessageSource`] to every topic in the
//! [`HandlerRegistry`] and feeds each message through it until cancelled.
//!
//! Two dispatch modes are available:
//!
//! - [`DispatchMode::Ordered`] (default) routes each message to one of N
//!   bounded lanes keyed by `(entity, id)`, retries retryable failures,
//!   dead-letters the rest and commits a partition's offset only once every
//!   earlier message of that partition has finished.
//! - [`DispatchMode::Detached`] spawns each handler without awaiting it and
//!   commits right away. Handler errors are only logged, and two events for
//!   the same record may be applied out of order.

mod lanes;
pub mod offsets;
pub mod retry;
pub mod source;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use self::lanes::{Completion, Job, LaneContext, LanePool};
use self::offsets::OffsetTracker;
use self::source::{CommitOffset, InboundMessage, MessageSource};
use crate::dead_letter::{DeadLetter, DeadLetterSink};
use crate::error::SyncError;
use crate::registry::HandlerRegistry;

pub use offsets::PartitionKey;
pub use retry::RetryPolicy;

/// Default number of ordered lanes.
pub const DEFAULT_LANES: usize = 8;

/// Default per-lane queue depth.
pub const DEFAULT_LANE_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Fire-and-forget: spawn, commit, move on.
    Detached,
    /// Per-record ordering over `lanes` workers with `capacity` queued jobs each.
    Ordered { lanes: usize, capacity: usize },
}

impl Default for DispatchMode {
    fn default() -> Self {
        DispatchMode::Ordered {
            lanes: DEFAULT_LANES,
            capacity: DEFAULT_LANE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub mode: DispatchMode,
    pub retry: RetryPolicy,
    /// How long shutdown waits for in-flight messages.
    pub shutdown_timeout: Duration,
    /// How often a stats summary is logged.
    pub stats_interval: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            retry: RetryPolicy::default(),
            shutdown_timeout: Duration::from_secs(30),
            stats_interval: Duration::from_secs(60),
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Live counters, shared with the lanes.
#[derive(Debug, Default)]
pub struct ConsumerStats {
    pub received: AtomicU64,
    pub dropped_empty: AtomicU64,
    pub ignored: AtomicU64,
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
    pub retried: AtomicU64,
    pub dead_lettered: AtomicU64,
    pub committed: AtomicU64,
}

/// Point-in-time copy of [`ConsumerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub received: u64,
    pub dropped_empty: u64,
    pub ignored: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub retried: u64,
    pub dead_lettered: u64,
    pub committed: u64,
}

impl ConsumerStats {
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            dropped_empty: self.dropped_empty.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            retried: self.retried.load(Ordering::Relaxed),
            dead_lettered: self.dead_lettered.load(Ordering::Relaxed),
            committed: self.committed.load(Ordering::Relaxed),
        }
    }

    fn log(&self, label: &'static str) {
        let s = self.snapshot();
        tracing::info!(
            received = s.received,
            dropped_empty = s.dropped_empty,
            ignored = s.ignored,
            succeeded = s.succeeded,
            failed = s.failed,
            retried = s.retried,
            dead_lettered = s.dead_lettered,
            committed = s.committed,
            "{}",
            label,
        );
    }
}

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

/// What to do with a received message before any handler runs.
enum Prepared {
    /// Empty value or unregistered topic.
    Skip,
    Malformed(serde_json::Error),
    Ready(serde_json::Value),
}

pub struct ConsumerRuntime<S> {
    source: S,
    registry: Arc<HandlerRegistry>,
    dead_letters: Arc<dyn DeadLetterSink>,
    config: ConsumerConfig,
    stats: Arc<ConsumerStats>,
}

impl<S: MessageSource> ConsumerRuntime<S> {
    pub fn new(
        source: S,
        registry: Arc<HandlerRegistry>,
        dead_letters: Arc<dyn DeadLetterSink>,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            source,
            registry,
            dead_letters,
            config,
            stats: Arc::new(ConsumerStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<ConsumerStats> {
        Arc::clone(&self.stats)
    }

    /// Subscribe and consume until `cancel` fires or the source ends.
    ///
    /// Returns the final counters once in-flight work has drained (or the
    /// shutdown timeout has passed) and the last offsets are committed.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<StatsSnapshot, SyncError> {
        let topics = self.registry.topics();
        self.source.subscribe(&topics).await?;
        tracing::info!(
            topics = topics.len(),
            mode = ?self.config.mode,
            "Consumer subscribed",
        );

        match self.config.mode {
            DispatchMode::Detached => self.run_detached(&cancel).await,
            DispatchMode::Ordered { lanes, capacity } => {
                self.run_ordered(lanes, capacity, &cancel).await
            }
        }

        self.stats.log("Consumer stopped");
        Ok(self.stats.snapshot())
    }

    async fn run_detached(&mut self, cancel: &CancellationToken) {
        let mut tasks = JoinSet::new();
        let mut ticker = tokio::time::interval(self.config.stats_interval);
        ticker.tick().await;

        loop {
            let message = tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.stats.log("Consumer stats");
                    continue;
                }
                Some(_) = tasks.join_next() => continue,
                next = self.source.recv() => match next {
                    Some(Ok(message)) => message,
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Failed to receive message");
                        continue;
                    }
                    None => break,
                },
            };

            match self.prepare(&message) {
                Prepared::Skip => {}
                Prepared::Malformed(e) => {
                    ConsumerStats::incr(&self.stats.failed);
                    tracing::error!(
                        topic = %message.topic,
                        partition = message.partition,
                        offset = message.offset,
                        error = %e,
                        "Malformed JSON, message skipped",
                    );
                }
                Prepared::Ready(value) => {
                    let registry = Arc::clone(&self.registry);
                    let stats = Arc::clone(&self.stats);
                    let topic = message.topic.clone();
                    tasks.spawn(async move {
                        match registry.dispatch(&topic, value).await {
                            Ok(_) => ConsumerStats::incr(&stats.succeeded),
                            Err(e) => {
                                ConsumerStats::incr(&stats.failed);
                                tracing::error!(%topic, error = %e, "Unhandled handler error");
                            }
                        }
                    });
                }
            }

            self.commit(CommitOffset {
                topic: message.topic,
                partition: message.partition,
                offset: message.offset + 1,
            })
            .await;
        }

        let shutdown_timeout = self.config.shutdown_timeout;
        let drain = async { while tasks.join_next().await.is_some() {} };
        if tokio::time::timeout(shutdown_timeout, drain)
            .await
            .is_err()
        {
            tracing::warn!(
                remaining = tasks.len(),
                "Shutdown timed out, aborting detached handlers",
            );
            tasks.shutdown().await;
        }
    }

    async fn run_ordered(&mut self, lanes: usize, capacity: usize, cancel: &CancellationToken) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let ctx = Arc::new(LaneContext {
            registry: Arc::clone(&self.registry),
            dead_letters: Arc::clone(&self.dead_letters),
            retry: self.config.retry.clone(),
            stats: Arc::clone(&self.stats),
            cancel: cancel.clone(),
        });
        let pool = LanePool::spawn(lanes, capacity, ctx, done_tx);
        let mut tracker = OffsetTracker::new();
        let mut ticker = tokio::time::interval(self.config.stats_interval);
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(done) = done_rx.recv() => self.settle(&mut tracker, done).await,
                _ = ticker.tick() => self.stats.log("Consumer stats"),
                next = self.source.recv() => match next {
                    Some(Ok(message)) => {
                        self.accept(message, &mut tracker, &pool, cancel).await;
                    }
                    Some(Err(e)) => tracing::warn!(error = %e, "Failed to receive message"),
                    None => break,
                },
            }
        }

        let mut workers = pool.close();
        let shutdown_timeout = self.config.shutdown_timeout;
        let drain = async {
            while let Some(done) = done_rx.recv().await {
                self.settle(&mut tracker, done).await;
            }
        };
        if tokio::time::timeout(shutdown_timeout, drain)
            .await
            .is_err()
        {
            tracing::warn!(
                in_flight = tracker.in_flight(),
                "Shutdown timed out, in-flight messages will be redelivered",
            );
        }
        workers.shutdown().await;
    }

    /// Route one message. Messages that need no handler finish immediately.
    async fn accept(
        &mut self,
        message: InboundMessage,
        tracker: &mut OffsetTracker,
        pool: &LanePool,
        cancel: &CancellationToken,
    ) {
        let key: PartitionKey = (message.topic.clone(), message.partition);
        tracker.begin(&key, message.offset);

        match self.prepare(&message) {
            Prepared::Skip => {}
            Prepared::Malformed(e) => {
                ConsumerStats::incr(&self.stats.failed);
                let letter = DeadLetter {
                    topic: message.topic.clone(),
                    partition: message.partition,
                    offset: message.offset,
                    payload: message.payload_text(),
                    error: SyncError::Json(e).to_string(),
                    attempts: 1,
                };
                lanes::dead_letter(self.dead_letters.as_ref(), &self.stats, letter).await;
            }
            Prepared::Ready(value) => {
                let entity = self
                    .registry
                    .route(&message.topic)
                    .map(|topic| topic.entity.name())
                    .unwrap_or_default();
                let id = value.get("id").and_then(serde_json::Value::as_i64);
                let lane = pool.lane_for(entity, id);
                let job = Job {
                    key,
                    offset: message.offset,
                    raw: message.payload_text(),
                    value,
                };
                if !pool.send(lane, job, cancel).await {
                    tracing::debug!(
                        topic = %message.topic,
                        offset = message.offset,
                        "Message not queued before shutdown",
                    );
                }
                return;
            }
        }

        let done = Completion {
            key,
            offset: message.offset,
        };
        self.settle(tracker, done).await;
    }

    fn prepare(&self, message: &InboundMessage) -> Prepared {
        ConsumerStats::incr(&self.stats.received);

        if message.is_empty() {
            ConsumerStats::incr(&self.stats.dropped_empty);
            tracing::trace!(
                topic = %message.topic,
                offset = message.offset,
                "Dropping empty message",
            );
            return Prepared::Skip;
        }

        if !self.registry.contains(&message.topic) {
            ConsumerStats::incr(&self.stats.ignored);
            return Prepared::Skip;
        }

        match serde_json::from_slice(message.payload.as_deref().unwrap_or_default()) {
            Ok(value) => Prepared::Ready(value),
            Err(e) => Prepared::Malformed(e),
        }
    }

    /// Mark a message finished and commit if the partition watermark moved.
    async fn settle(&mut self, tracker: &mut OffsetTracker, done: Completion) {
        if let Some(next) = tracker.complete(&done.key, done.offset) {
            let (topic, partition) = done.key;
            self.commit(CommitOffset {
                topic,
                partition,
                offset: next,
            })
            .await;
        }
    }

    async fn commit(&mut self, offset: CommitOffset) {
        match self.source.commit(std::slice::from_ref(&offset)).await {
            Ok(()) => ConsumerStats::incr(&self.stats.committed),
            Err(e) => tracing::warn!(
                topic = %offset.topic,
                partition = offset.partition,
                offset = offset.offset,
                error = %e,
                "Offset commit failed",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use hrsync_core::sync::{PayrollCompanyPayload, SyncRecord};
    use hrsync_core::topic::EntityKind;
    use hrsync_core::types::DbId;
    use serde_json::json;

    use super::source::testing::{channel_source, ChannelFeed};
    use super::*;
    use crate::dead_letter::MemoryDeadLetters;
    use crate::handlers::default_registry;
    use crate::store::{MemoryStore, MirrorStore};

    /// Slows down upserts whose `name` matches, to force overlap.
    struct DelayingStore {
        inner: MemoryStore,
        slow_name: &'static str,
        delay: Duration,
    }

    #[async_trait]
    impl MirrorStore for DelayingStore {
        async fn upsert(&self, record: &SyncRecord) -> Result<serde_json::Value, SyncError> {
            if record.to_json()["name"] == self.slow_name {
                tokio::time::sleep(self.delay).await;
            }
            self.inner.upsert(record).await
        }

        async fn delete(&self, kind: EntityKind, id: DbId) -> Result<(), SyncError> {
            self.inner.delete(kind, id).await
        }

        async fn fetch(&self, kind: EntityKind, id: DbId) -> Result<serde_json::Value, SyncError> {
            self.inner.fetch(kind, id).await
        }
    }

    struct Outcome {
        stats: StatsSnapshot,
        dead_letters: Vec<DeadLetter>,
        commits: Vec<CommitOffset>,
        subscribed: Vec<String>,
    }

    fn config(mode: DispatchMode) -> ConsumerConfig {
        ConsumerConfig {
            mode,
            retry: RetryPolicy {
                max_attempts: 3,
                initial_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(5),
                multiplier: 2.0,
            },
            shutdown_timeout: Duration::from_secs(5),
            stats_interval: Duration::from_secs(3600),
        }
    }

    fn ordered() -> DispatchMode {
        DispatchMode::Ordered {
            lanes: 4,
            capacity: 8,
        }
    }

    /// Run the consumer over whatever `feed` queues, until the feed runs dry.
    async fn consume(
        store: Arc<dyn MirrorStore>,
        mode: DispatchMode,
        feed: impl FnOnce(&ChannelFeed),
    ) -> Outcome {
        let (source, tx) = channel_source();
        let subscribed = Arc::clone(&source.subscribed);
        let commits = Arc::clone(&source.commits);
        feed(&tx);
        drop(tx);

        let registry = Arc::new(default_registry(store).unwrap());
        let sink = Arc::new(MemoryDeadLetters::new());
        let runtime = ConsumerRuntime::new(source, registry, sink.clone(), config(mode));
        let stats = runtime.run(CancellationToken::new()).await.unwrap();

        let commits = commits.lock().await.clone();
        let subscribed = subscribed.lock().await.clone();
        Outcome {
            stats,
            dead_letters: sink.letters().await,
            commits,
            subscribed,
        }
    }

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

    fn department(name: &str) -> serde_json::Value {
        json!({ "id": 42, "code": "HR", "name": name, "companyId": 1 })
    }

    #[tokio::test]
    async fn subscribes_to_every_registered_topic() {
        let out = consume(Arc::new(MemoryStore::new()), ordered(), |_| {}).await;
        assert_eq!(out.subscribed.len(), 36);
        assert!(out.subscribed.contains(&"event.DepartmentLeadership.deleted".to_string()));
        assert_eq!(out.stats, StatsSnapshot::default());
    }

    #[tokio::test]
    async fn empty_messages_are_dropped_without_a_handler_call() {
        let store = Arc::new(MemoryStore::new());
        let out = consume(store.clone(), ordered(), |feed| {
            feed.push("event.Department.created", None);
            feed.push("event.Department.created", Some(""));
        })
        .await;

        assert_eq!(out.stats.received, 2);
        assert_eq!(out.stats.dropped_empty, 2);
        assert_eq!(out.stats.succeeded + out.stats.failed, 0);
        assert_eq!(store.write_count(), 0);
        assert_eq!(out.commits.last().map(|c| c.offset), Some(2));
    }

    #[tokio::test]
    async fn unknown_topics_are_ignored_and_committed() {
        let store = Arc::new(MemoryStore::new());
        let out = consume(store.clone(), ordered(), |feed| {
            feed.push_json("event.Payslip.created", json!({ "id": 1 }));
            feed.push_json("event.Currency.deleted", json!({ "id": 1 }));
        })
        .await;

        assert_eq!(out.stats.ignored, 2);
        assert!(out.dead_letters.is_empty());
        assert_eq!(store.write_count(), 0);
        assert_eq!(out.commits.last().map(|c| c.offset), Some(2));
    }

    #[tokio::test]
    async fn malformed_json_is_dead_lettered_and_consumption_continues() {
        let store = store_with_company().await;
        let out = consume(store.clone(), ordered(), |feed| {
            feed.push("event.Department.created", Some("{not json"));
            feed.push_json("event.Department.created", department("Human Resources"));
        })
        .await;

        assert_eq!(out.dead_letters.len(), 1);
        assert_eq!(out.dead_letters[0].offset, 0);
        assert_eq!(out.dead_letters[0].payload, "{not json");
        assert!(out.dead_letters[0].error.starts_with("Malformed JSON"));
        assert_eq!(out.stats.succeeded, 1);
        assert!(store.get(EntityKind::Department, 42).await.is_some());
        assert_eq!(out.commits.last().map(|c| c.offset), Some(2));
    }

    #[tokio::test]
    async fn invalid_payload_is_dead_lettered_without_retry() {
        let store = store_with_company().await;
        let out = consume(store, ordered(), |feed| {
            feed.push_json(
                "event.Department.created",
                json!({ "id": 42, "name": "No code", "companyId": 1 }),
            );
        })
        .await;

        assert_eq!(out.stats.retried, 0);
        assert_eq!(out.stats.dead_lettered, 1);
        assert_eq!(out.dead_letters[0].attempts, 1);
        assert!(out.dead_letters[0].error.contains("event.Department.created"));
    }

    #[tokio::test]
    async fn missing_reference_is_retried_then_dead_lettered() {
        let store = Arc::new(MemoryStore::new());
        let out = consume(store.clone(), ordered(), |feed| {
            feed.push_json("event.Department.created", department("Human Resources"));
        })
        .await;

        assert_eq!(out.stats.retried, 2);
        assert_eq!(out.stats.failed, 1);
        assert_eq!(out.dead_letters.len(), 1);
        assert_eq!(out.dead_letters[0].attempts, 3);
        assert!(store.is_empty().await);
        // Dead-lettered messages still release the partition.
        assert_eq!(out.commits.last().map(|c| c.offset), Some(1));
    }

    #[tokio::test]
    async fn company_delete_is_dead_lettered_while_referenced() {
        let store = store_with_company().await;
        let out = consume(store.clone(), ordered(), |feed| {
            feed.push_json("event.PayrollCompany.deleted", json!({ "id": 1 }));
        })
        .await;

        // Company 1 is unreferenced here, so it goes.
        assert_eq!(out.stats.succeeded, 1);
        assert!(store.is_empty().await);

        let store = store_with_company().await;
        store
            .upsert(&SyncRecord::from(
                serde_json::from_value::<hrsync_core::sync::DepartmentPayload>(department("HR"))
                    .unwrap(),
            ))
            .await
            .unwrap();
        let out = consume(store.clone(), ordered(), |feed| {
            feed.push_json("event.PayrollCompany.deleted", json!({ "id": 1 }));
        })
        .await;

        assert_eq!(out.stats.retried, 0);
        assert_eq!(out.dead_letters.len(), 1);
        assert!(out.dead_letters[0].error.starts_with("Record in use"));
        assert!(store.get(EntityKind::PayrollCompany, 1).await.is_some());
    }

    #[tokio::test]
    async fn commits_never_move_backwards() {
        let store = store_with_company().await;
        let out = consume(store, ordered(), |feed| {
            for id in 1..=20 {
                feed.push_json(
                    "event.Holiday.created",
                    json!({ "id": id, "companyId": 1, "name": "Holiday", "date": "2026-12-25" }),
                );
            }
        })
        .await;

        assert_eq!(out.stats.succeeded, 20);
        let offsets: Vec<i64> = out.commits.iter().map(|c| c.offset).collect();
        assert!(offsets.windows(2).all(|w| w[0] < w[1]), "{offsets:?}");
        assert_eq!(offsets.last(), Some(&20));
    }

    async fn stale_overwrite_store() -> Arc<DelayingStore> {
        let store = Arc::new(DelayingStore {
            inner: MemoryStore::new(),
            slow_name: "Old name",
            delay: Duration::from_millis(100),
        });
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

    #[tokio::test]
    async fn ordered_shutdown_commits_work_finished_while_draining() {
        let store = stale_overwrite_store().await;
        // The feed ends while the slow upsert is still running in its lane.
        let out = consume(store.clone(), ordered(), |feed| {
            feed.push_json("event.Department.modified", department("Old name"));
        })
        .await;

        assert_eq!(out.stats.succeeded, 1);
        assert_eq!(out.commits.last().map(|c| c.offset), Some(1));
        let stored = store.fetch(EntityKind::Department, 42).await.unwrap();
        assert_eq!(stored["name"], "Old name");
    }

    #[tokio::test]
    async fn ordered_shutdown_timeout_leaves_in_flight_work_uncommitted() {
        let store = stale_overwrite_store().await;
        let (source, feed) = channel_source();
        let commits = Arc::clone(&source.commits);
        feed.push_json("event.Department.modified", department("Old name"));
        drop(feed);

        let registry = Arc::new(default_registry(store).unwrap());
        let impatient = ConsumerConfig {
            shutdown_timeout: Duration::from_millis(10),
            ..config(ordered())
        };
        let runtime =
            ConsumerRuntime::new(source, registry, Arc::new(MemoryDeadLetters::new()), impatient);
        let stats = runtime.run(CancellationToken::new()).await.unwrap();

        assert_eq!(stats.succeeded, 0);
        assert!(commits.lock().await.is_empty());
    }

    #[tokio::test]
    async fn detached_mode_can_apply_an_older_event_last() {
        let store = stale_overwrite_store().await;
        let out = consume(store.clone(), DispatchMode::Detached, |feed| {
            feed.push_json("event.Department.modified", department("Old name"));
            feed.push_json("event.Department.modified", department("New name"));
        })
        .await;

        assert_eq!(out.stats.succeeded, 2);
        // Committed before either handler finished.
        assert_eq!(out.commits.len(), 2);
        let stored = store.fetch(EntityKind::Department, 42).await.unwrap();
        assert_eq!(stored["name"], "Old name");
    }

    #[tokio::test]
    async fn ordered_mode_keeps_the_newest_event() {
        let store = stale_overwrite_store().await;
        let out = consume(store.clone(), ordered(), |feed| {
            feed.push_json("event.Department.modified", department("Old name"));
            feed.push_json("event.Department.modified", department("New name"));
        })
        .await;

        assert_eq!(out.stats.succeeded, 2);
        let stored = store.fetch(EntityKind::Department, 42).await.unwrap();
        assert_eq!(stored["name"], "New name");
    }

    #[tokio::test]
    async fn detached_mode_only_logs_handler_errors() {
        let store = Arc::new(MemoryStore::new());
        let out = consume(store, DispatchMode::Detached, |feed| {
            feed.push_json("event.Department.created", department("Human Resources"));
            feed.push("event.Department.created", Some("{not json"));
        })
        .await;

        assert_eq!(out.stats.failed, 2);
        assert_eq!(out.stats.retried, 0);
        assert!(out.dead_letters.is_empty());
        assert_eq!(out.commits.len(), 2);
    }

    #[tokio::test]
    async fn cancellation_stops_an_idle_consumer() {
        let (source, _feed) = channel_source();
        let registry = Arc::new(default_registry(Arc::new(MemoryStore::new())).unwrap());
        let runtime = ConsumerRuntime::new(
            source,
            registry,
            Arc::new(MemoryDeadLetters::new()),
            config(ordered()),
        );
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(runtime.run(cancel.clone()));

        cancel.cancel();
        let stats = handle.await.unwrap().unwrap();
        assert_eq!(stats.received, 0);
    }
}
