// lib.rs

pub use std::{
    net,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

pub use anyhow::bail;
pub use chrono::{DateTime, Local};
pub use serde::Serialize;
pub use tokio::sync::RwLock;
pub use tracing::{debug, error, info, warn};

mod config;
pub use config::*;

mod measure;
pub use measure::*;

mod state;
pub use state::*;

mod apiserver;
pub use apiserver::*;

pub const FW_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuzzerState {
    On,
    Off,
}

impl BuzzerState {
    /// Alarm is on when the temperature has reached the threshold.
    pub fn decide(temperature: f64, threshold: f64) -> Self {
        if temperature >= threshold {
            BuzzerState::On
        } else {
            BuzzerState::Off
        }
    }
}

impl std::fmt::Display for BuzzerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuzzerState::On => write!(f, "ON"),
            BuzzerState::Off => write!(f, "OFF"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BuzzerReply {
    pub buzzer_state: BuzzerState,
}

#[derive(Clone, Debug, Serialize)]
pub struct ThresholdReply {
    pub message: String,
    pub new_threshold: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Uptime {
    pub uptime: u64,
    pub uptime_s: String,
}

// EOF
