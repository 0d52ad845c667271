use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::fs::config_dir;

const FILE_NAME: &str = "core.toml";

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://formspree.io/f/your-form-id";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The core configuration shared by every frontend, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Hosted backend. When absent the application runs against seeded in-memory data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`
    pub url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    pub endpoint: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RELAY_ENDPOINT.into(),
        }
    }
}

/// Credentials accepted by the admin login while in demo mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub email: String,
    pub password: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            email: "admin@example.com".into(),
            password: "levelup".into(),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            remote: None,
            relay: RelayConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Load the configuration from the XDG config directory, writing the defaults on first
    /// run, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_from(&Self::path()?)?;
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join(FILE_NAME))
    }

    fn apply_env(&mut self) {
        let url = var("LEVELFOLIO_STORE_URL");
        let anon_key = var("LEVELFOLIO_ANON_KEY");

        match (url, anon_key) {
            (Some(url), Some(anon_key)) => {
                info!("Using backend {url} from environment");
                self.remote = Some(RemoteConfig { url, anon_key });
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!("LEVELFOLIO_STORE_URL and LEVELFOLIO_ANON_KEY must be set together, ignoring");
            }
            (None, None) => {}
        }

        if let Some(endpoint) = var("LEVELFOLIO_RELAY_URL") {
            info!("Using relay endpoint {endpoint} from environment");
            self.relay.endpoint = endpoint;
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
