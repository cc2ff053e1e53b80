//! Configuration types for the contacts service
//!
//! A [`ServiceConfig`] is built once at startup and handed to whichever
//! component needs it. Nothing here reads the environment; that is the
//! daemon's job.

use serde::{Deserialize, Serialize};

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Human-readable service title (used in logs)
    #[serde(default = "default_title")]
    pub title: String,

    /// Key-value store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP listener configuration
    #[serde(default)]
    pub http: HttpConfig,
}

impl ServiceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            title: default_title(),
            store: StoreConfig::default(),
            http: HttpConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.title.trim().is_empty() {
            return Err(crate::Error::config("Service title cannot be empty"));
        }

        self.store.validate()?;
        self.http.validate()?;

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Key-value store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory store (not persistent)
    Memory,

    /// Redis server
    Redis {
        /// Server host name or address
        host: String,
        /// Server port
        port: u16,
        /// Logical database index
        #[serde(default)]
        db: u32,
    },
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::Redis { host, port, .. } => {
                if host.trim().is_empty() {
                    return Err(crate::Error::config("Redis host cannot be empty"));
                }
                if *port == 0 {
                    return Err(crate::Error::config("Redis port must be > 0"));
                }
                Ok(())
            }
            StoreConfig::Memory => Ok(()),
        }
    }

    /// Get the store type name used for registry lookup
    pub fn type_name(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::Redis { .. } => "redis",
        }
    }

    /// Connection URL for URL-addressed backends
    pub fn url(&self) -> Option<String> {
        match self {
            StoreConfig::Redis { host, port, db } => {
                Some(format!("redis://{}:{}/{}", host, port, db))
            }
            StoreConfig::Memory => None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Redis {
            host: "127.0.0.1".to_string(),
            port: 6379,
            db: 0,
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind host
    #[serde(default = "default_http_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_http_port")]
    pub port: u16,

    /// URL prefix all routes are mounted under (e.g. "/api/v1")
    #[serde(default)]
    pub prefix: String,
}

impl HttpConfig {
    /// Validate the HTTP configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.host.trim().is_empty() {
            return Err(crate::Error::config("HTTP host cannot be empty"));
        }
        if self.port == 0 {
            return Err(crate::Error::config("HTTP port must be > 0"));
        }
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(crate::Error::config(format!(
                "URL prefix cannot contain whitespace: {:?}",
                self.prefix
            )));
        }
        Ok(())
    }

    /// Prefix with exactly one leading slash and no trailing slash.
    ///
    /// Returns an empty string when routes live at the root.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Socket address string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            prefix: String::new(),
        }
    }
}

fn default_title() -> String {
    "contacts".to_string()
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8000
}
