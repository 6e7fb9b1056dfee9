//! Worker lanes for [`DispatchMode::Ordered`](super::DispatchMode::Ordered).
//!
//! Each lane is a bounded channel drained by one task, so every event for the
//! same record is applied strictly in delivery order. Failed events are retried
//! with backoff inside the lane and dead-lettered once retries run out.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use hrsync_core::types::DbId;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::offsets::PartitionKey;
use super::retry::{next_delay, RetryPolicy};
use super::ConsumerStats;
use crate::dead_letter::{DeadLetter, DeadLetterSink};
use crate::registry::{Dispatch, HandlerRegistry};

/// A decoded message waiting for its lane.
pub(super) struct Job {
    pub key: PartitionKey,
    pub offset: i64,
    pub raw: String,
    pub value: serde_json::Value,
}

impl Job {
    fn topic(&self) -> &str {
        &self.key.0
    }
}

/// A message that is finished with, successfully or not.
#[derive(Debug)]
pub(super) struct Completion {
    pub key: PartitionKey,
    pub offset: i64,
}

/// Shared by every lane.
pub(super) struct LaneContext {
    pub registry: Arc<HandlerRegistry>,
    pub dead_letters: Arc<dyn DeadLetterSink>,
    pub retry: RetryPolicy,
    pub stats: Arc<ConsumerStats>,
    pub cancel: CancellationToken,
}

pub(super) struct LanePool {
    senders: Vec<mpsc::Sender<Job>>,
    workers: JoinSet<()>,
}

impl LanePool {
    /// Spawn `lanes` workers, each behind a channel of `capacity` jobs.
    pub fn spawn(
        lanes: usize,
        capacity: usize,
        ctx: Arc<LaneContext>,
        done: mpsc::UnboundedSender<Completion>,
    ) -> Self {
        let mut senders = Vec::with_capacity(lanes.max(1));
        let mut workers = JoinSet::new();
        for index in 0..lanes.max(1) {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            senders.push(tx);
            workers.spawn(run_lane(index, rx, Arc::clone(&ctx), done.clone()));
        }
        Self { senders, workers }
    }

    pub fn lane_for(&self, entity: &str, id: Option<DbId>) -> usize {
        lane_index(entity, id, self.senders.len())
    }

    /// Queue `job` on `lane`, waiting for room. Returns `false` when the
    /// runtime is cancelled first or the lane has stopped.
    pub async fn send(&self, lane: usize, job: Job, cancel: &CancellationToken) -> bool {
        let Some(sender) = self.senders.get(lane) else {
            return false;
        };
        tokio::select! {
            _ = cancel.cancelled() => false,
            sent = sender.send(job) => sent.is_ok(),
        }
    }

    /// Stop accepting jobs. Lanes finish what is queued and then exit.
    pub fn close(self) -> JoinSet<()> {
        let Self { senders, workers } = self;
        drop(senders);
        workers
    }
}

/// Stable lane for a record: same entity and id, same lane.
pub(super) fn lane_index(entity: &str, id: Option<DbId>, lanes: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    entity.hash(&mut hasher);
    id.hash(&mut hasher);
    (hasher.finish() % lanes.max(1) as u64) as usize
}

async fn run_lane(
    index: usize,
    mut jobs: mpsc::Receiver<Job>,
    ctx: Arc<LaneContext>,
    done: mpsc::UnboundedSender<Completion>,
) {
    while let Some(job) = jobs.recv().await {
        let Some(completion) = apply(&ctx, job).await else {
            tracing::info!(lane = index, "Lane stopped during retry backoff");
            return;
        };
        if done.send(completion).is_err() {
            return;
        }
    }
    tracing::debug!(lane = index, "Lane drained");
}

/// Apply one job, retrying retryable failures. Returns `None` when cancelled
/// mid-backoff; the job then stays uncommitted and is redelivered.
async fn apply(ctx: &LaneContext, job: Job) -> Option<Completion> {
    let mut attempts = 0u32;
    let mut delay = ctx.retry.initial_delay;

    loop {
        attempts += 1;
        let err = match ctx.registry.dispatch(job.topic(), job.value.clone()).await {
            Ok(Dispatch::Handled(_)) => {
                ConsumerStats::incr(&ctx.stats.succeeded);
                break;
            }
            Ok(Dispatch::Ignored) => {
                ConsumerStats::incr(&ctx.stats.ignored);
                break;
            }
            Err(e) => e,
        };

        if err.is_retryable() && ctx.retry.allows_retry(attempts) {
            ConsumerStats::incr(&ctx.stats.retried);
            tracing::warn!(
                topic = job.topic(),
                partition = job.key.1,
                offset = job.offset,
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying event",
            );
            tokio::select! {
                _ = ctx.cancel.cancelled() => return None,
                _ = tokio::time::sleep(delay) => {}
            }
            delay = next_delay(delay, &ctx.retry);
            continue;
        }

        ConsumerStats::incr(&ctx.stats.failed);
        let letter = DeadLetter {
            topic: job.topic().to_string(),
            partition: job.key.1,
            offset: job.offset,
            payload: job.raw.clone(),
            error: err.to_string(),
            attempts,
        };
        dead_letter(ctx.dead_letters.as_ref(), &ctx.stats, letter).await;
        break;
    }

    Some(Completion {
        key: job.key,
        offset: job.offset,
    })
}

/// Record a dead letter. A failing sink is logged; the message still counts
/// as finished so the partition does not stall.
pub(super) async fn dead_letter(
    sink: &dyn DeadLetterSink,
    stats: &ConsumerStats,
    letter: DeadLetter,
) {
    let (topic, partition, offset) = (letter.topic.clone(), letter.partition, letter.offset);
    tracing::warn!(%topic, partition, offset, error = %letter.error, "Dead-lettering event");
    match sink.record(letter).await {
        Ok(()) => ConsumerStats::incr(&stats.dead_lettered),
        Err(e) => tracing::error!(
            %topic,
            partition,
            offset,
            error = %e,
            "Failed to record dead letter, event is dropped",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_record_always_maps_to_same_lane() {
        let first = lane_index("Employee", Some(100), 8);
        for _ in 0..10 {
            assert_eq!(lane_index("Employee", Some(100), 8), first);
        }
        assert!(first < 8);
    }

    #[test]
    fn single_lane_takes_everything() {
        for id in 1..50 {
            assert_eq!(lane_index("Department", Some(id), 1), 0);
        }
        assert_eq!(lane_index("Department", None, 0), 0);
    }

    #[test]
    fn records_spread_across_lanes() {
        let used: std::collections::HashSet<usize> =
            (1..200).map(|id| lane_index("Employee", Some(id), 8)).collect();
        assert!(used.len() > 1);
    }
}
