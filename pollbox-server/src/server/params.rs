use std::path::PathBuf;
use clap::Parser;
use crate::BrokerConfig;

/// Command line / environment. Anything set here wins over the config file.
#[derive(Parser, Debug)]
#[command(name = "pollbox-server")]
pub struct Params {
    /// Optional TOML file with broker settings.
    #[arg(long, env = "POLLBOX_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "POLLBOX_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    #[arg(long, env = "POLLBOX_PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "POLLBOX_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Params {
    pub fn apply_to(&self, mut cfg: BrokerConfig) -> BrokerConfig {
        if let Some(dir) = &self.storage_dir {
            cfg.storage_dir = dir.clone();
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        cfg
    }
}
