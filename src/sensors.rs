// sensors.rs

use std::fmt;

use crate::*;

/// Everything the dashboard knows about the house.
///
/// One instance lives inside the control loop. It starts zeroed and is
/// updated by the inbound feed and by console `set` commands.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SensorState {
    pub temperature: f32,
    pub light_level: f32,
    pub motion_detected: bool,
    pub intruder_detected: bool,
    pub fire_detected: bool,
    /// Percent, the companion board reports 0, 25, 50, 75 or 100.
    pub tank_level: i32,
    pub needs_watering: bool,
    pub pump_on: bool,
    /// Chip temperature, only written by the local sample step.
    pub internal_temperature: f32,
}

impl SensorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to power-on values. The chip temperature is a live reading,
    /// not a fake one, so it survives.
    pub fn reset(&mut self) {
        *self = Self {
            internal_temperature: self.internal_temperature,
            ..Self::default()
        };
    }

    pub fn report(&self) -> SensorReport {
        SensorReport::from(self)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.report()).unwrap_or_else(|_| "{}".to_string())
    }
}

fn yes_no(v: bool) -> &'static str {
    if v { "Yes" } else { "No" }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Current Values]")?;
        writeln!(f, "Temperature: {:.2}", self.temperature)?;
        writeln!(f, "Fire Detected: {}", yes_no(self.fire_detected))?;
        writeln!(f, "Light Level: {:.2}", self.light_level)?;
        writeln!(f, "Motion Detected: {}", yes_no(self.motion_detected))?;
        writeln!(f, "Intruder Detected: {}", yes_no(self.intruder_detected))?;
        writeln!(f, "Tank Level: {}", self.tank_level)?;
        writeln!(f, "Needs Watering: {}", yes_no(self.needs_watering))?;
        writeln!(f, "Pump Status: {}", if self.pump_on { "ON" } else { "OFF" })?;
        write!(f, "ESP32 Temp: {:.2}", self.internal_temperature)
    }
}

/// The `/data` document. Flags go out as 0/1 because the dashboard
/// script and older clients expect numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReport {
    pub temp: f32,
    pub fire: u8,
    pub light: f32,
    pub motion: u8,
    pub intruder: u8,
    pub tank: i32,
    pub watering: u8,
    pub pump: u8,
    pub esp32_temp: f32,
}

impl From<&SensorState> for SensorReport {
    fn from(s: &SensorState) -> Self {
        SensorReport {
            temp: s.temperature,
            fire: s.fire_detected.into(),
            light: s.light_level,
            motion: s.motion_detected.into(),
            intruder: s.intruder_detected.into(),
            tank: s.tank_level,
            watering: s.needs_watering.into(),
            pump: s.pump_on.into(),
            esp32_temp: s.internal_temperature,
        }
    }
}


// EOF
