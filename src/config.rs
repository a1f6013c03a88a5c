// config.rs

use std::{env, net};

use anyhow::{Context, bail};
use serde::Serialize;
use tracing::*;

const DEFAULT_API_PORT: u16 = 8080;
const DEFAULT_THRESHOLD: f64 = 35.0;

const ENV_LISTEN: &str = "TEMPALARM_LISTEN";
const ENV_PORT: &str = "TEMPALARM_PORT";
const ENV_THRESHOLD: &str = "TEMPALARM_THRESHOLD";

#[derive(Clone, Debug, Serialize)]
pub struct MyConfig {
    pub listen: net::IpAddr,
    pub port: u16,
    pub threshold: f64,
}

impl Default for MyConfig {
    fn default() -> Self {
        Self {
            listen: net::IpAddr::V4(net::Ipv4Addr::UNSPECIFIED),
            port: option_env!("API_PORT")
                .unwrap_or("-")
                .parse()
                .unwrap_or(DEFAULT_API_PORT),
            threshold: option_env!("DEFAULT_THRESHOLD")
                .unwrap_or("-")
                .parse()
                .ok()
                .filter(|t: &f64| t.is_finite())
                .unwrap_or(DEFAULT_THRESHOLD),
        }
    }
}

impl MyConfig {
    /// Compiled-in defaults, overridden by the process environment and `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => bail!("Cannot read .env: {e}"),
        }
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_LISTEN) {
            config.listen = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_LISTEN}: invalid address {v:?}"))?;
        }
        if let Some(v) = lookup(ENV_PORT) {
            config.port = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT}: invalid port {v:?}"))?;
        }
        if let Some(v) = lookup(ENV_THRESHOLD) {
            let threshold: f64 = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_THRESHOLD}: invalid number {v:?}"))?;
            if !threshold.is_finite() {
                bail!("{ENV_THRESHOLD}: threshold must be finite, got {v:?}");
            }
            config.threshold = threshold;
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> net::SocketAddr {
        net::SocketAddr::new(self.listen, self.port)
    }
}


// EOF
