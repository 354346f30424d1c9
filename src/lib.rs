// lib.rs
#![warn(clippy::large_futures)]

pub use std::{
    net,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

pub use anyhow::bail;
pub use log::*;
pub use serde::{Deserialize, Serialize};
pub use tokio::{
    sync::{RwLock, watch},
    time::{Duration, sleep},
};

mod config;
pub use config::*;

mod state;
pub use state::*;

mod sensors;
pub use sensors::*;

mod feed;
pub use feed::*;

mod command;
pub use command::*;

mod serial;
pub use serial::*;

mod measure;
pub use measure::*;

mod lcd;
pub use lcd::*;

mod control;
pub use control::*;

mod apiserver;
pub use apiserver::*;

#[cfg(target_os = "espidf")]
mod wifi;
#[cfg(target_os = "espidf")]
pub use wifi::*;

pub const FW_VERSION: &str = env!("CARGO_PKG_VERSION");

// EOF
