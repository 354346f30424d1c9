// config.rs

use serde::{Deserialize, Serialize};

const DEFAULT_API_PORT: u16 = 80;
const DEFAULT_AP_CHANNEL: u8 = 1;
const DEFAULT_FEED_BAUD: u32 = 9600;
const DEFAULT_CONSOLE_BAUD: u32 = 115_200;
const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;
const DEFAULT_LOOP_DELAY_MS: u64 = 10;
const DEFAULT_LCD_ADDR: u8 = 0x27;

// Settings are baked in at build time, nothing is kept in nvs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MyConfig {
    pub port: u16,

    pub ap_ssid: String,
    pub ap_pass: String,
    pub ap_channel: u8,

    pub feed_baud: u32,
    pub console_baud: u32,

    pub sample_interval_ms: u64,
    pub loop_delay_ms: u64,

    pub lcd_addr: u8,
}

impl Default for MyConfig {
    fn default() -> Self {
        Self {
            port: option_env!("API_PORT")
                .unwrap_or("-")
                .parse()
                .unwrap_or(DEFAULT_API_PORT),

            ap_ssid: option_env!("AP_SSID").unwrap_or("SmartHouse_AP").into(),
            ap_pass: option_env!("AP_PASS").unwrap_or("12345678").into(),
            ap_channel: DEFAULT_AP_CHANNEL,

            feed_baud: DEFAULT_FEED_BAUD,
            console_baud: DEFAULT_CONSOLE_BAUD,

            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            loop_delay_ms: DEFAULT_LOOP_DELAY_MS,

            lcd_addr: DEFAULT_LCD_ADDR,
        }
    }
}


// EOF
