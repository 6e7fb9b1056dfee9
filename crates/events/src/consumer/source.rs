//! The broker seam.
//!
//! [`MessageSource`] is what the runtime pulls from. Production uses
//! [`KafkaSource`](crate::kafka::KafkaSource); tests feed messages through an
//! in-process channel.

use async_trait::async_trait;

use crate::error::SyncError;

/// One record as delivered by the broker.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Message value. `None` for tombstones and empty records.
    pub payload: Option<Vec<u8>>,
}

impl InboundMessage {
    /// Whether the value is absent or zero-length.
    pub fn is_empty(&self) -> bool {
        self.payload.as_deref().map_or(true, <[u8]>::is_empty)
    }

    /// The value as text for logs and dead letters.
    pub fn payload_text(&self) -> String {
        self.payload
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }
}

/// Position to commit: the next offset the group should read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitOffset {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
}

#[async_trait]
pub trait MessageSource: Send {
    /// Subscribe to `topics`, starting from the earliest retained offset when
    /// the group has no committed position.
    async fn subscribe(&mut self, topics: &[String]) -> Result<(), SyncError>;

    /// Next message. `None` once the source is exhausted.
    async fn recv(&mut self) -> Option<Result<InboundMessage, SyncError>>;

    async fn commit(&mut self, offsets: &[CommitOffset]) -> Result<(), SyncError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use tokio::sync::{mpsc, Mutex};

    use super::*;

    /// Feeds queued messages and records subscriptions and commits.
    pub struct ChannelSource {
        rx: mpsc::UnboundedReceiver<InboundMessage>,
        pub subscribed: Arc<Mutex<Vec<String>>>,
        pub commits: Arc<Mutex<Vec<CommitOffset>>>,
    }

    #[derive(Clone)]
    pub struct ChannelFeed {
        tx: mpsc::UnboundedSender<InboundMessage>,
        next_offset: Arc<std::sync::atomic::AtomicI64>,
    }

    impl ChannelFeed {
        /// Queue a message on partition 0 with the next offset.
        pub fn push(&self, topic: &str, payload: Option<&str>) -> i64 {
            let offset = self
                .next_offset
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.tx
                .send(InboundMessage {
                    topic: topic.to_string(),
                    partition: 0,
                    offset,
                    payload: payload.map(|p| p.as_bytes().to_vec()),
                })
                .unwrap();
            offset
        }

        pub fn push_json(&self, topic: &str, value: serde_json::Value) -> i64 {
            self.push(topic, Some(&value.to_string()))
        }
    }

    /// A source that ends once every [`ChannelFeed`] clone is dropped and the
    /// queue is empty.
    pub fn channel_source() -> (ChannelSource, ChannelFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = ChannelSource {
            rx,
            subscribed: Arc::default(),
            commits: Arc::default(),
        };
        let feed = ChannelFeed {
            tx,
            next_offset: Arc::default(),
        };
        (source, feed)
    }

    #[async_trait]
    impl MessageSource for ChannelSource {
        async fn subscribe(&mut self, topics: &[String]) -> Result<(), SyncError> {
            self.subscribed.lock().await.extend_from_slice(topics);
            Ok(())
        }

        async fn recv(&mut self) -> Option<Result<InboundMessage, SyncError>> {
            self.rx.recv().await.map(Ok)
        }

        async fn commit(&mut self, offsets: &[CommitOffset]) -> Result<(), SyncError> {
            self.commits.lock().await.extend_from_slice(offsets);
            Ok(())
        }
    }
}
