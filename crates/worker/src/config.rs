use std::path::PathBuf;
use std::time::Duration;

use hrsync_core::config::{parse_or, ConfigError};
use hrsync_events::consumer::{DEFAULT_LANES, DEFAULT_LANE_CAPACITY};
use hrsync_events::{ConsumerConfig, DispatchMode, KafkaConfig, KafkaTls, RetryPolicy};

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub database_url: String,
    pub kafka: KafkaConfig,
    pub consumer: ConsumerConfig,
}

impl SyncConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default          |
    /// |------------------------------|------------------|
    /// | `DATABASE_URL`               | required         |
    /// | `KAFKA_BROKERS`              | `localhost:9092` |
    /// | `KAFKA_CLIENT_ID`            | `hrsync`         |
    /// | `KAFKA_GROUP_ID`             | `hrsync-mirror`  |
    /// | `KAFKA_CONNECT_TIMEOUT_MS`   | `10000`          |
    /// | `KAFKA_SSL_CA_PATH`          | unset            |
    /// | `KAFKA_SSL_CERT_PATH`        | unset            |
    /// | `KAFKA_SSL_KEY_PATH`         | unset            |
    /// | `SYNC_DISPATCH_MODE`         | `ordered`        |
    /// | `SYNC_LANES`                 | `8`              |
    /// | `SYNC_LANE_CAPACITY`         | `64`             |
    /// | `SYNC_MAX_ATTEMPTS`          | `5`              |
    /// | `SYNC_RETRY_INITIAL_MS`      | `200`            |
    /// | `SYNC_RETRY_MAX_MS`          | `10000`          |
    /// | `SYNC_SHUTDOWN_TIMEOUT_SECS` | `30`             |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let defaults = KafkaConfig::default();
        let connect_ms = parse_or(
            "KAFKA_CONNECT_TIMEOUT_MS",
            get("KAFKA_CONNECT_TIMEOUT_MS"),
            defaults.connect_timeout.as_millis() as u64,
        )?;
        let tls = match get("KAFKA_SSL_CA_PATH") {
            Some(ca) => Some(KafkaTls {
                ca_path: PathBuf::from(ca),
                cert_path: get("KAFKA_SSL_CERT_PATH").map(PathBuf::from),
                key_path: get("KAFKA_SSL_KEY_PATH").map(PathBuf::from),
            }),
            None => None,
        };
        let kafka = KafkaConfig {
            brokers: get("KAFKA_BROKERS").unwrap_or(defaults.brokers),
            client_id: get("KAFKA_CLIENT_ID").unwrap_or(defaults.client_id),
            group_id: get("KAFKA_GROUP_ID").unwrap_or(defaults.group_id),
            connect_timeout: Duration::from_millis(connect_ms),
            tls,
        };

        let mode = match get("SYNC_DISPATCH_MODE").as_deref().map(str::trim) {
            None | Some("ordered") => DispatchMode::Ordered {
                lanes: positive("SYNC_LANES", get("SYNC_LANES"), DEFAULT_LANES)?,
                capacity: positive(
                    "SYNC_LANE_CAPACITY",
                    get("SYNC_LANE_CAPACITY"),
                    DEFAULT_LANE_CAPACITY,
                )?,
            },
            Some("detached") => DispatchMode::Detached,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "SYNC_DISPATCH_MODE",
                    value: other.to_string(),
                    reason: "expected `ordered` or `detached`".to_string(),
                })
            }
        };

        let base = RetryPolicy::default();
        let retry = RetryPolicy {
            max_attempts: positive(
                "SYNC_MAX_ATTEMPTS",
                get("SYNC_MAX_ATTEMPTS"),
                base.max_attempts,
            )?,
            initial_delay: Duration::from_millis(parse_or(
                "SYNC_RETRY_INITIAL_MS",
                get("SYNC_RETRY_INITIAL_MS"),
                base.initial_delay.as_millis() as u64,
            )?),
            max_delay: Duration::from_millis(parse_or(
                "SYNC_RETRY_MAX_MS",
                get("SYNC_RETRY_MAX_MS"),
                base.max_delay.as_millis() as u64,
            )?),
            ..base
        };

        let consumer_defaults = ConsumerConfig::default();
        let shutdown_secs = parse_or(
            "SYNC_SHUTDOWN_TIMEOUT_SECS",
            get("SYNC_SHUTDOWN_TIMEOUT_SECS"),
            consumer_defaults.shutdown_timeout.as_secs(),
        )?;
        let consumer = ConsumerConfig {
            mode,
            retry,
            shutdown_timeout: Duration::from_secs(shutdown_secs),
            ..consumer_defaults
        };

        Ok(Self {
            database_url,
            kafka,
            consumer,
        })
    }
}

/// Like [`parse_or`], but zero is rejected.
fn positive<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let value = parse_or(var, raw.clone(), default)?;
    if value == T::default() {
        return Err(ConfigError::Invalid {
            var,
            value: raw.unwrap_or_default(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&'static str, &str)]) -> Result<SyncConfig, ConfigError> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        SyncConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/hrsync")]).unwrap();

        assert_eq!(config.kafka.brokers, "localhost:9092");
        assert_eq!(config.kafka.group_id, "hrsync-mirror");
        assert_eq!(config.kafka.connect_timeout, Duration::from_secs(10));
        assert!(config.kafka.tls.is_none());
        assert_eq!(
            config.consumer.mode,
            DispatchMode::Ordered {
                lanes: 8,
                capacity: 64
            }
        );
        assert_eq!(config.consumer.retry.max_attempts, 5);
        assert_eq!(config.consumer.shutdown_timeout, Duration::from_secs(30));
    }

    #[test]
    fn database_url_is_required() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        assert_matches!(
            load(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/hrsync"),
            ("KAFKA_BROKERS", "k1:9093,k2:9093"),
            ("KAFKA_SSL_CA_PATH", "/etc/kafka/ca.pem"),
            ("KAFKA_SSL_KEY_PATH", "/etc/kafka/client.key"),
            ("SYNC_LANES", "2"),
            ("SYNC_MAX_ATTEMPTS", "3"),
            ("SYNC_RETRY_INITIAL_MS", "50"),
        ])
        .unwrap();

        assert_eq!(config.kafka.brokers, "k1:9093,k2:9093");
        let tls = config.kafka.tls.unwrap();
        assert_eq!(tls.ca_path, PathBuf::from("/etc/kafka/ca.pem"));
        assert_eq!(tls.cert_path, None);
        assert_eq!(tls.key_path, Some(PathBuf::from("/etc/kafka/client.key")));
        assert_eq!(
            config.consumer.mode,
            DispatchMode::Ordered {
                lanes: 2,
                capacity: 64
            }
        );
        assert_eq!(config.consumer.retry.max_attempts, 3);
        assert_eq!(config.consumer.retry.initial_delay, Duration::from_millis(50));
    }

    #[test]
    fn detached_mode_is_selectable() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/hrsync"),
            ("SYNC_DISPATCH_MODE", "detached"),
        ])
        .unwrap();
        assert_eq!(config.consumer.mode, DispatchMode::Detached);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_matches!(
            load(&[("DATABASE_URL", "x"), ("SYNC_DISPATCH_MODE", "parallel")]),
            Err(ConfigError::Invalid { var: "SYNC_DISPATCH_MODE", .. })
        );
        assert_matches!(
            load(&[("DATABASE_URL", "x"), ("SYNC_LANES", "0")]),
            Err(ConfigError::Invalid { var: "SYNC_LANES", .. })
        );
        assert_matches!(
            load(&[("DATABASE_URL", "x"), ("KAFKA_CONNECT_TIMEOUT_MS", "soon")]),
            Err(ConfigError::Invalid { var: "KAFKA_CONNECT_TIMEOUT_MS", .. })
        );
    }
}
