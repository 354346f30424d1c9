// feed.rs

use std::fmt;

use serde::Deserializer;

use crate::*;

/// One update line from the companion board, e.g.
/// `{"temp":21.5,"fire":false,"light":300,"motion":true,"intruder":false,"tank":50,"watering":true,"pump":false}`
///
/// All eight keys must be present. Unknown keys are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct FeedFrame {
    pub temp: f32,
    #[serde(deserialize_with = "flag")]
    pub fire: bool,
    pub light: f32,
    #[serde(deserialize_with = "flag")]
    pub motion: bool,
    #[serde(deserialize_with = "flag")]
    pub intruder: bool,
    pub tank: f64,
    #[serde(deserialize_with = "flag")]
    pub watering: bool,
    #[serde(deserialize_with = "flag")]
    pub pump: bool,
}

// the firmware on the other end sends either true/false or 1/0
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

#[derive(Debug)]
pub enum FeedError {
    Json(serde_json::Error),
    NotAnObject,
    NotFinite(&'static str),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Json(e) => write!(f, "Parsing failed: {e}"),
            FeedError::NotAnObject => write!(f, "Parsing failed: not a json object"),
            FeedError::NotFinite(key) => write!(f, "Parsing failed: {key} is out of range"),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(value: serde_json::Error) -> Self {
        FeedError::Json(value)
    }
}

impl FeedFrame {
    pub fn parse(line: &str) -> Result<Self, FeedError> {
        // a derived struct would also take a positional array
        let value: serde_json::Value = serde_json::from_str(line.trim())?;
        let serde_json::Value::Object(map) = value else {
            return Err(FeedError::NotAnObject);
        };
        let frame: FeedFrame = serde_json::from_value(serde_json::Value::Object(map))?;

        // numbers past f32 range decode as inf and would export as null
        if !frame.temp.is_finite() {
            return Err(FeedError::NotFinite("temp"));
        }
        if !frame.light.is_finite() {
            return Err(FeedError::NotFinite("light"));
        }
        if !frame.tank.is_finite() {
            return Err(FeedError::NotFinite("tank"));
        }
        Ok(frame)
    }
}

impl SensorState {
    /// Overwrite the relayed fields from a decoded frame. The chip
    /// temperature is ours and is left alone.
    pub fn apply_feed(&mut self, frame: &FeedFrame) {
        self.temperature = frame.temp;
        self.fire_detected = frame.fire;
        self.light_level = frame.light;
        self.motion_detected = frame.motion;
        self.intruder_detected = frame.intruder;
        self.tank_level = frame.tank as i32;
        self.needs_watering = frame.watering;
        self.pump_on = frame.pump;
    }

    /// Decode a feed line and commit it as a whole, or leave the state
    /// untouched if anything is wrong with it.
    pub fn update_from_feed(&mut self, line: &str) -> Result<(), FeedError> {
        let frame = FeedFrame::parse(line)?;
        self.apply_feed(&frame);
        Ok(())
    }
}


// EOF
