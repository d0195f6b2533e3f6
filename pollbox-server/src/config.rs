use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Broker-wide settings. Every field has a default, so a partial TOML file
/// (or none at all) is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Where `.req` / `.resp` records live. Must exist before startup.
    pub storage_dir: PathBuf,

    pub port: u16,

    /// How often pending requests are scanned for orphans.
    pub orphan_scan_interval_secs: u64,

    /// Pending requests older than this are reported. They are never deleted.
    pub orphan_warn_after_secs: u64,

    /// One of trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("BrokerFolder"),
            port: 9093,
            orphan_scan_interval_secs: 60,          // 1 minute
            orphan_warn_after_secs: 60 * 60,        // 1 hour
            log_level: "info".to_string(),
        }
    }
}

impl BrokerConfig {
    /// Not validated here: command line overrides still apply on top.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::read_from_file(p),
            None => Ok(Self::default()),
        }
    }

    fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading {:?}", path.as_ref()))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parsing broker config TOML")
    }

    pub fn validate(&self) -> Result<()> {
        if self.orphan_scan_interval_secs == 0 {
            bail!("orphan_scan_interval_secs must be greater than zero");
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .with_context(|| format!("unknown log level {:?}", self.log_level))
    }

    pub fn orphan_scan_interval(&self) -> Duration {
        Duration::from_secs(self.orphan_scan_interval_secs)
    }

    pub fn orphan_warn_after(&self) -> Duration {
        Duration::from_secs(self.orphan_warn_after_secs)
    }
}
