use std::{path::Path, time::Duration};

use config::{Config, ConfigError};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub db: i64,
    #[serde(default)]
    pub read_timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: 0,
            read_timeout_ms: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

impl Settings {
    /// Reads `probe.toml` if present, then `PROBE_*` environment variables.
    pub fn read() -> Result<Self, ConfigError> {
        Self::read_from("probe.toml")
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("PROBE").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn url(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };

        match self.db {
            0 => format!("redis://{}:{}", host, self.port),
            db => format!("redis://{}:{}/{}", host, self.port, db),
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}
