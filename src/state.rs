// state.rs

use crate::*;

/// What the http side shares. Sensor values come in through `data`, the
/// control loop is the only writer.
pub struct MyState {
    pub config: MyConfig,
    pub api_cnt: AtomicU32,
    pub ap_up: RwLock<bool>,
    pub data: watch::Receiver<SensorReport>,
}

impl MyState {
    pub fn new(config: MyConfig, data: watch::Receiver<SensorReport>) -> Self {
        MyState {
            config,
            api_cnt: AtomicU32::new(0),
            ap_up: RwLock::new(false),
            data,
        }
    }
}

// EOF
