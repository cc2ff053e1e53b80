// # contactsd - Contacts Service Daemon
//
// Thin integration layer. All record-lifecycle logic lives in contacts-core;
// this binary only wires configuration, logging, the store backend and the
// HTTP listener together.
//
// The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Registering store backends and resolving the configured one
// 4. Serving HTTP until SIGTERM/SIGINT
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Service
// - `CONTACTS_TITLE`: Service title shown in logs (default: contacts)
// - `CONTACTS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ### Store
// - `CONTACTS_STORE_TYPE`: redis or memory (default: redis)
// - `CONTACTS_REDIS_HOST`: Redis host (default: 127.0.0.1)
// - `CONTACTS_REDIS_PORT`: Redis port (default: 6379)
// - `CONTACTS_REDIS_DB`: Logical database index (default: 0)
//
// ### HTTP
// - `CONTACTS_HTTP_HOST`: Bind host (default: 0.0.0.0)
// - `CONTACTS_HTTP_PORT`: Bind port (default: 8000)
// - `CONTACTS_URL_PREFIX`: Prefix for all routes (default: none)
//
// ## Example
//
// ```bash
// export CONTACTS_REDIS_HOST=redis.internal
// export CONTACTS_REDIS_DB=2
// export CONTACTS_URL_PREFIX=/api/v1
//
// contactsd
// ```

use anyhow::{Context, Result};
use contacts_core::{ContactService, HttpConfig, ServiceConfig, StoreConfig, StoreRegistry};
use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ContactsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ContactsExitCode> for ExitCode {
    fn from(code: ContactsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Process configuration read from the environment
#[derive(Debug)]
struct Config {
    service: ServiceConfig,
    log_level: Level,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store_type = lookup("CONTACTS_STORE_TYPE").unwrap_or_else(|| "redis".to_string());
        let store = match store_type.to_lowercase().as_str() {
            "redis" => StoreConfig::Redis {
                host: lookup("CONTACTS_REDIS_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: parse_or(&lookup, "CONTACTS_REDIS_PORT", 6379)?,
                db: parse_or(&lookup, "CONTACTS_REDIS_DB", 0)?,
            },
            "memory" => StoreConfig::Memory,
            other => anyhow::bail!(
                "CONTACTS_STORE_TYPE '{}' is not supported. \
                Supported types: redis, memory",
                other
            ),
        };

        let defaults = HttpConfig::default();
        let http = HttpConfig {
            host: lookup("CONTACTS_HTTP_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "CONTACTS_HTTP_PORT", defaults.port)?,
            prefix: lookup("CONTACTS_URL_PREFIX").unwrap_or_default(),
        };

        let mut service = ServiceConfig::new();
        if let Some(title) = lookup("CONTACTS_TITLE") {
            service.title = title;
        }
        service.store = store;
        service.http = http;

        let log_level = lookup("CONTACTS_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_level = match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => anyhow::bail!(
                "CONTACTS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                log_level
            ),
        };

        Ok(Self { service, log_level })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.service.validate()?;
        Ok(())
    }
}

/// Parse an optional numeric variable; present-but-invalid is an error
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} must be a number. Got '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ContactsExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ContactsExitCode::ConfigError.into();
    }

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ContactsExitCode::ConfigError.into();
    }

    info!("Starting {}", config.service.title);

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ContactsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let service = match build_service(&config.service) {
            Ok(service) => service,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return ContactsExitCode::ConfigError;
            }
        };

        if let Err(e) = serve(service, &config.service.http).await {
            error!("Daemon error: {:#}", e);
            ContactsExitCode::RuntimeError
        } else {
            ContactsExitCode::CleanShutdown
        }
    })
    .into()
}

/// Register backends and build the service over the configured store
fn build_service(config: &ServiceConfig) -> Result<Arc<ContactService>> {
    let registry = StoreRegistry::with_builtin();

    #[cfg(feature = "redis")]
    {
        info!("Registering Redis store backend");
        contacts_store_redis::register(&registry);
    }

    let connector = registry
        .create_connector(&config.store)
        .with_context(|| format!("cannot create '{}' store", config.store.type_name()))?;

    match config.store.url() {
        Some(url) => info!("Store backend: {} ({})", connector.backend_name(), url),
        None => info!("Store backend: {}", connector.backend_name()),
    }

    Ok(Arc::new(ContactService::new(connector)))
}

/// Serve HTTP until a shutdown signal arrives
async fn serve(service: Arc<ContactService>, http: &HttpConfig) -> Result<()> {
    let app = contacts_http::build_router(service, http);

    let bind_addr = http.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    let prefix = http.normalized_prefix();
    info!(
        "HTTP server listening on {} (prefix: {})",
        bind_addr,
        if prefix.is_empty() { "/" } else { prefix.as_str() }
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutting down daemon");
    Ok(())
}

/// Resolve when SIGTERM or SIGINT is received
#[cfg(unix)]
async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to setup SIGTERM handler: {}", e);
            return;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to setup SIGINT handler: {}", e);
            return;
        }
    };

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    info!("Received shutdown signal: {}", name);
}

/// Resolve on CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal: SIGINT"),
        Err(e) => error!("Failed to wait for CTRL-C: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(
            config.service.store.url().as_deref(),
            Some("redis://127.0.0.1:6379/0")
        );
        assert_eq!(config.service.http.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.service.http.normalized_prefix(), "");
    }

    #[test]
    fn test_full_environment() {
        let config = Config::from_lookup(lookup_from(&[
            ("CONTACTS_TITLE", "phonebook"),
            ("CONTACTS_REDIS_HOST", "redis.internal"),
            ("CONTACTS_REDIS_PORT", "6380"),
            ("CONTACTS_REDIS_DB", "2"),
            ("CONTACTS_HTTP_PORT", "9000"),
            ("CONTACTS_URL_PREFIX", "api/v1/"),
            ("CONTACTS_LOG_LEVEL", "DEBUG"),
        ]))
        .unwrap();

        assert_eq!(config.service.title, "phonebook");
        assert_eq!(
            config.service.store.url().as_deref(),
            Some("redis://redis.internal:6380/2")
        );
        assert_eq!(config.service.http.port, 9000);
        assert_eq!(config.service.http.normalized_prefix(), "/api/v1");
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_memory_store() {
        let config = Config::from_lookup(lookup_from(&[("CONTACTS_STORE_TYPE", "memory")])).unwrap();
        assert_eq!(config.service.store, StoreConfig::Memory);
        assert!(build_service(&config.service).is_ok());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(Config::from_lookup(lookup_from(&[("CONTACTS_REDIS_PORT", "sixty")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("CONTACTS_HTTP_PORT", "70000")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("CONTACTS_STORE_TYPE", "etcd")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("CONTACTS_LOG_LEVEL", "loud")])).is_err());
    }

    #[test]
    fn test_zero_port_fails_validation() {
        let config = Config::from_lookup(lookup_from(&[("CONTACTS_HTTP_PORT", "0")])).unwrap();
        assert!(config.validate().is_err());
    }
}
