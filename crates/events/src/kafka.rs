//! Kafka-backed [`MessageSource`].

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::{Offset, TopicPartitionList};

use crate::consumer::source::{CommitOffset, InboundMessage, MessageSource};
use crate::error::SyncError;

/// Client certificate material for brokers that require TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaTls {
    pub ca_path: PathBuf,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct KafkaConfig {
    /// Comma-separated `host:port` list.
    pub brokers: String,
    pub client_id: String,
    pub group_id: String,
    pub connect_timeout: Duration,
    /// Plaintext when `None`.
    pub tls: Option<KafkaTls>,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            client_id: "hrsync".to_string(),
            group_id: "hrsync-mirror".to_string(),
            connect_timeout: Duration::from_secs(10),
            tls: None,
        }
    }
}

impl KafkaConfig {
    /// librdkafka settings for the mirror consumer group.
    ///
    /// Offsets are committed manually by the runtime, and a group with no
    /// committed position starts from the earliest retained message.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("client.id", &self.client_id)
            .set("group.id", &self.group_id)
            .set("enable.auto.commit", "false")
            .set("enable.auto.offset.store", "false")
            .set("auto.offset.reset", "earliest")
            .set(
                "socket.connection.setup.timeout.ms",
                self.connect_timeout.as_millis().to_string(),
            );

        if let Some(tls) = &self.tls {
            config
                .set("security.protocol", "ssl")
                .set("ssl.ca.location", tls.ca_path.to_string_lossy());
            if let Some(cert) = &tls.cert_path {
                config.set("ssl.certificate.location", cert.to_string_lossy());
            }
            if let Some(key) = &tls.key_path {
                config.set("ssl.key.location", key.to_string_lossy());
            }
        }
        config
    }
}

/// A consumer-group member reading mirror topics.
pub struct KafkaSource {
    consumer: StreamConsumer,
}

impl KafkaSource {
    pub fn connect(config: &KafkaConfig) -> Result<Self, SyncError> {
        let consumer: StreamConsumer = config.client_config().create()?;
        tracing::info!(
            brokers = %config.brokers,
            group_id = %config.group_id,
            tls = config.tls.is_some(),
            "Kafka consumer created",
        );
        Ok(Self { consumer })
    }
}

#[async_trait]
impl MessageSource for KafkaSource {
    async fn subscribe(&mut self, topics: &[String]) -> Result<(), SyncError> {
        let topics: Vec<&str> = topics.iter().map(String::as_str).collect();
        self.consumer.subscribe(&topics)?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<InboundMessage, SyncError>> {
        let next = self.consumer.stream().next().await?;
        Some(
            next.map(|m| InboundMessage {
                topic: m.topic().to_string(),
                partition: m.partition(),
                offset: m.offset(),
                payload: m.payload().map(<[u8]>::to_vec),
            })
            .map_err(SyncError::from),
        )
    }

    async fn commit(&mut self, offsets: &[CommitOffset]) -> Result<(), SyncError> {
        let mut list = TopicPartitionList::new();
        for o in offsets {
            list.add_partition_offset(&o.topic, o.partition, Offset::Offset(o.offset))?;
        }
        self.consumer.commit(&list, CommitMode::Async)?;
        Ok(())
    }
}
