// # Redis Record Store
//
// This crate provides the Redis backend of the contacts record store port.
//
// ## Connection Scope
//
// `RedisConnector` holds a parsed `redis::Client` and performs no I/O until
// a request calls `connect()`. Each call opens one multiplexed connection
// owned by the returned `RedisConnection`; dropping it closes the socket.
// No connection outlives the request that opened it.
//
// ## Atomic Transitions
//
// The conditional primitives map to single Redis commands:
//
// | Primitive | Command | Applied when |
// |---|---|---|
// | `insert_if_absent` | `SET key value NX` | reply is `OK` |
// | `replace_if_present` | `SET key value XX` | reply is `OK` |
// | `remove_if_present` | `DEL key` | reply is `1` |
//
// so two concurrent creates for the same phone cannot both succeed.
//
// ## Error Mapping
//
// - Refused, dropped or timed-out connections: `Error::Connection`
// - Command errors (`WRONGTYPE`, `READONLY`, ...): `Error::Store`
//
// Both surface to callers as `StoreUnavailable`; the text is logged only.

use async_trait::async_trait;
use contacts_core::config::StoreConfig;
use contacts_core::registry::StoreRegistry;
use contacts_core::traits::{RecordStore, StoreConnector, StoreConnectorFactory};
use contacts_core::{Error, Result};
use redis::aio::MultiplexedConnection;
use redis::{FromRedisValue, RedisError, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Maximum time to establish a connection
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum time for a single command round trip
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Register the Redis backend under the "redis" store type
pub fn register(registry: &StoreRegistry) {
    registry.register("redis", Box::new(RedisConnectorFactory));
}

/// Redis connector
///
/// Cheap to share; holds connection parameters only.
#[derive(Clone)]
pub struct RedisConnector {
    client: redis::Client,
    url: String,
    connect_timeout: Duration,
    command_timeout: Duration,
}

impl std::fmt::Debug for RedisConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConnector")
            .field("url", &self.url)
            .field("connect_timeout", &self.connect_timeout)
            .field("command_timeout", &self.command_timeout)
            .finish()
    }
}

impl RedisConnector {
    /// Create a connector from a `redis://host:port/db` URL
    ///
    /// Only parses the URL; no connection is attempted.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let client = redis::Client::open(url.as_str())
            .map_err(|e| Error::config(format!("Invalid Redis URL {}: {}", url, e)))?;

        Ok(Self {
            client,
            url,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        })
    }

    /// Create a connector from store configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        match config.url() {
            Some(url) if config.type_name() == "redis" => Self::new(url),
            _ => Err(Error::config(format!(
                "Redis connector cannot be built from a '{}' store config",
                config.type_name()
            ))),
        }
    }

    /// Override the connect timeout
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Override the per-command timeout
    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    /// The URL this connector targets
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StoreConnector for RedisConnector {
    async fn connect(&self) -> Result<Box<dyn RecordStore>> {
        let conn = match timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => return Err(map_redis_error(e)),
            Err(_) => {
                return Err(Error::connection(format!(
                    "Timed out connecting to {} after {:?}",
                    self.url, self.connect_timeout
                )));
            }
        };

        tracing::trace!("Opened Redis connection to {}", self.url);

        Ok(Box::new(RedisConnection {
            conn,
            command_timeout: self.command_timeout,
        }))
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

/// One Redis connection, closed on drop
pub struct RedisConnection {
    conn: MultiplexedConnection,
    command_timeout: Duration,
}

impl RedisConnection {
    async fn query<T>(&self, cmd: &redis::Cmd) -> Result<T>
    where
        T: FromRedisValue + Send,
    {
        // Clones share the same socket; the handle is only needed as &mut.
        let mut conn = self.conn.clone();
        match timeout(self.command_timeout, cmd.query_async(&mut conn)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_redis_error(e)),
            Err(_) => Err(Error::connection(format!(
                "Redis command timed out after {:?}",
                self.command_timeout
            ))),
        }
    }
}

#[async_trait]
impl RecordStore for RedisConnection {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.query(redis::cmd("GET").arg(key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _: Value = self.query(redis::cmd("SET").arg(key).arg(value)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let _: i64 = self.query(redis::cmd("DEL").arg(key)).await?;
        Ok(())
    }

    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<bool> {
        let reply: Value = self
            .query(redis::cmd("SET").arg(key).arg(value).arg("NX"))
            .await?;
        Ok(conditional_set_applied(&reply))
    }

    async fn replace_if_present(&self, key: &str, value: &str) -> Result<bool> {
        let reply: Value = self
            .query(redis::cmd("SET").arg(key).arg(value).arg("XX"))
            .await?;
        Ok(conditional_set_applied(&reply))
    }

    async fn remove_if_present(&self, key: &str) -> Result<bool> {
        let removed: i64 = self.query(redis::cmd("DEL").arg(key)).await?;
        Ok(removed > 0)
    }
}

/// `SET ... NX|XX` replies nil when the condition did not hold
fn conditional_set_applied(reply: &Value) -> bool {
    !matches!(reply, Value::Nil)
}

fn map_redis_error(err: RedisError) -> Error {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        Error::connection(format!("Redis connection failed: {}", err))
    } else {
        Error::store(format!("Redis command failed: {}", err))
    }
}

/// Factory registered under the "redis" store type
#[derive(Debug, Default)]
pub struct RedisConnectorFactory;

impl StoreConnectorFactory for RedisConnectorFactory {
    fn create(&self, config: &StoreConfig) -> Result<Arc<dyn StoreConnector>> {
        let connector = RedisConnector::from_config(config)?;
        tracing::debug!("Created Redis connector for {}", connector.url());
        Ok(Arc::new(connector))
    }
}
