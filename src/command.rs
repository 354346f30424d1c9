// command.rs

use std::{fmt, str::FromStr};

use embedded_hal::digital::OutputPin;

use crate::*;

pub const HELP_TEXT: &str = "Available Commands:
 - check
 - set temp <value>
 - set fire <true/false>
 - set light <value>
 - set motion <true/false>
 - set intruder <true/false>
 - set tank <0/25/50/75/100>
 - set watering <true/false>
 - set pump <true/false>
 - reset";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Temp,
    Fire,
    Light,
    Motion,
    Intruder,
    Tank,
    Watering,
    Pump,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Temp,
        Field::Fire,
        Field::Light,
        Field::Motion,
        Field::Intruder,
        Field::Tank,
        Field::Watering,
        Field::Pump,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Temp => "temp",
            Field::Fire => "fire",
            Field::Light => "light",
            Field::Motion => "motion",
            Field::Intruder => "intruder",
            Field::Tank => "tank",
            Field::Watering => "watering",
            Field::Pump => "pump",
        }
    }

    fn setting(self, token: &str) -> Result<Setting, CommandError> {
        Ok(match self {
            Field::Temp => Setting::Temp(number(self, token)?),
            Field::Light => Setting::Light(number(self, token)?),
            Field::Tank => Setting::Tank(number(self, token)? as i32),
            Field::Fire => Setting::Fire(flag(token)),
            Field::Motion => Setting::Motion(flag(token)),
            Field::Intruder => Setting::Intruder(flag(token)),
            Field::Watering => Setting::Watering(flag(token)),
            Field::Pump => Setting::Pump(flag(token)),
        })
    }
}

impl FromStr for Field {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or(CommandError::UnknownField)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn number(field: Field, token: &str) -> Result<f32, CommandError> {
    match token.parse::<f32>() {
        // NaN and inf would turn into null in the json export
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CommandError::InvalidNumber {
            field,
            token: token.to_string(),
        }),
    }
}

// Only the literal `true` switches a flag on, anything else is false.
fn flag(token: &str) -> bool {
    match token {
        "true" => true,
        "false" => false,
        other => {
            warn!("Not a boolean: {other:?}, using false");
            false
        }
    }
}

/// A parsed value, typed by the field it goes to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Setting {
    Temp(f32),
    Fire(bool),
    Light(f32),
    Motion(bool),
    Intruder(bool),
    Tank(i32),
    Watering(bool),
    Pump(bool),
}

impl Setting {
    pub fn field(&self) -> Field {
        match self {
            Setting::Temp(_) => Field::Temp,
            Setting::Fire(_) => Field::Fire,
            Setting::Light(_) => Field::Light,
            Setting::Motion(_) => Field::Motion,
            Setting::Intruder(_) => Field::Intruder,
            Setting::Tank(_) => Field::Tank,
            Setting::Watering(_) => Field::Watering,
            Setting::Pump(_) => Field::Pump,
        }
    }
}

impl SensorState {
    pub fn apply(&mut self, setting: Setting) {
        match setting {
            Setting::Temp(v) => self.temperature = v,
            Setting::Fire(v) => self.fire_detected = v,
            Setting::Light(v) => self.light_level = v,
            Setting::Motion(v) => self.motion_detected = v,
            Setting::Intruder(v) => self.intruder_detected = v,
            Setting::Tank(v) => self.tank_level = v,
            Setting::Watering(v) => self.needs_watering = v,
            Setting::Pump(v) => self.pump_on = v,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command<'a> {
    Help,
    Check,
    Reset,
    Set { setting: Setting, raw: &'a str },
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let cmd = match (words.next(), words.next()) {
            (Some("help"), None) => Command::Help,
            (Some("check"), None) => Command::Check,
            (Some("reset"), None) => Command::Reset,
            (Some("set"), field) => {
                let (Some(field), Some(raw), None) = (field, words.next(), words.next()) else {
                    return Err(CommandError::InvalidFormat);
                };
                let setting = field.parse::<Field>()?.setting(raw)?;
                Command::Set { setting, raw }
            }
            _ => return Err(CommandError::UnknownCommand),
        };
        Ok(cmd)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CommandError {
    InvalidFormat,
    UnknownField,
    InvalidNumber { field: Field, token: String },
    UnknownCommand,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidFormat => write!(f, "Invalid format. Use: set <type> <value>"),
            CommandError::UnknownField => write!(
                f,
                "Unknown type. Try: temp, fire, light, motion, intruder, tank, watering, pump"
            ),
            CommandError::InvalidNumber { field, token } => {
                write!(f, "Invalid value {token:?} for {field}, expected a number")
            }
            CommandError::UnknownCommand => {
                write!(f, "Unknown command. Type 'help' for available commands.")
            }
        }
    }
}

impl std::error::Error for CommandError {}

/// Runs console commands against the sensor state. Owns the buzzer line
/// that follows the intruder flag.
pub struct Interpreter<P> {
    alarm: P,
}

impl<P: OutputPin> Interpreter<P> {
    pub fn new(alarm: P) -> Self {
        Interpreter { alarm }
    }

    pub fn alarm(&self) -> &P {
        &self.alarm
    }

    /// Returns the text to print back, `None` for blank input.
    pub fn handle_line(&mut self, line: &str, state: &mut SensorState) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let reply = match Command::parse(line) {
            Ok(cmd) => self.execute(cmd, state),
            Err(e) => {
                warn!("Console: {line:?}: {e}");
                e.to_string()
            }
        };
        Some(reply)
    }

    pub fn execute(&mut self, cmd: Command<'_>, state: &mut SensorState) -> String {
        match cmd {
            Command::Help => HELP_TEXT.to_string(),
            Command::Check => state.to_string(),
            Command::Reset => {
                state.reset();
                info!("Reset all values to default.");
                "Reset all values to default.".to_string()
            }
            Command::Set { setting, raw } => {
                state.apply(setting);
                if let Setting::Intruder(on) = setting {
                    self.drive_alarm(on);
                }
                info!("Set {} to {setting:?}", setting.field());
                format!("Set {} to {raw}", setting.field())
            }
        }
    }

    fn drive_alarm(&mut self, on: bool) {
        let res = if on {
            self.alarm.set_high()
        } else {
            self.alarm.set_low()
        };
        if let Err(e) = res {
            error!("Alarm output write failed: {e:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::digital::{ErrorKind, ErrorType};

    use super::*;

    #[derive(Default)]
    struct MockPin {
        high: Option<bool>,
    }

    impl ErrorType for MockPin {
        type Error = ErrorKind;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = Some(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = Some(true);
            Ok(())
        }
    }

    fn run(line: &str, state: &mut SensorState) -> (Option<String>, Option<bool>) {
        let mut interp = Interpreter::new(MockPin::default());
        let reply = interp.handle_line(line, state);
        (reply, interp.alarm().high)
    }

    #[test]
    fn parses_the_grammar() {
        assert_eq!(Command::parse("help"), Ok(Command::Help));
        assert_eq!(Command::parse("check"), Ok(Command::Check));
        assert_eq!(Command::parse("reset"), Ok(Command::Reset));
        assert_eq!(
            Command::parse("set temp 21.5"),
            Ok(Command::Set {
                setting: Setting::Temp(21.5),
                raw: "21.5"
            })
        );
        assert_eq!(
            Command::parse("set  pump   true"),
            Ok(Command::Set {
                setting: Setting::Pump(true),
                raw: "true"
            })
        );
        assert_eq!(Command::parse("HELP"), Err(CommandError::UnknownCommand));
        assert_eq!(Command::parse("help me"), Err(CommandError::UnknownCommand));
        assert_eq!(Command::parse("settemp 3"), Err(CommandError::UnknownCommand));
    }

    #[test]
    fn set_touches_only_its_field() {
        let base = SensorState {
            temperature: 10.0,
            light_level: 20.0,
            tank_level: 25,
            internal_temperature: 30.0,
            ..Default::default()
        };

        let cases: [(&str, fn(&mut SensorState)); 8] = [
            ("set temp -4.5", |s| s.temperature = -4.5),
            ("set fire true", |s| s.fire_detected = true),
            ("set light 999", |s| s.light_level = 999.0),
            ("set motion true", |s| s.motion_detected = true),
            ("set intruder true", |s| s.intruder_detected = true),
            ("set tank 100", |s| s.tank_level = 100),
            ("set watering true", |s| s.needs_watering = true),
            ("set pump true", |s| s.pump_on = true),
        ];

        for (line, expect) in cases {
            let mut state = base;
            let mut wanted = base;
            expect(&mut wanted);

            let (reply, _) = run(line, &mut state);
            assert_eq!(state, wanted, "{line}");
            assert!(reply.unwrap().starts_with("Set "), "{line}");
        }
    }

    #[test]
    fn tank_is_not_range_checked() {
        let mut state = SensorState::new();
        let (reply, _) = run("set tank 37", &mut state);
        assert_eq!(state.tank_level, 37);
        assert_eq!(reply.as_deref(), Some("Set tank to 37"));
    }

    #[test]
    fn intruder_drives_the_alarm_line() {
        let mut state = SensorState::new();
        assert_eq!(run("set intruder true", &mut state).1, Some(true));
        assert!(state.intruder_detected);

        assert_eq!(run("set intruder false", &mut state).1, Some(false));
        assert!(!state.intruder_detected);

        state.intruder_detected = true;
        assert_eq!(run("set intruder yes", &mut state).1, Some(false));
        assert!(!state.intruder_detected);

        // other flags leave the line alone
        assert_eq!(run("set fire true", &mut state).1, None);
    }

    #[test]
    fn anything_but_true_is_false() {
        for token in ["false", "TRUE", "1", "on", "tru"] {
            let mut state = SensorState {
                pump_on: true,
                ..Default::default()
            };
            run(&format!("set pump {token}"), &mut state);
            assert!(!state.pump_on, "{token}");
        }
    }

    #[test]
    fn bad_input_is_reported_and_harmless() {
        let before = SensorState {
            temperature: 5.0,
            fire_detected: true,
            tank_level: 50,
            ..Default::default()
        };

        for (line, expect) in [
            ("frobnicate", "Unknown command. Type 'help' for available commands."),
            ("set", "Invalid format. Use: set <type> <value>"),
            ("set temp", "Invalid format. Use: set <type> <value>"),
            ("set temp 1 2", "Invalid format. Use: set <type> <value>"),
            (
                "set humidity 40",
                "Unknown type. Try: temp, fire, light, motion, intruder, tank, watering, pump",
            ),
            ("set temp warm", "Invalid value \"warm\" for temp, expected a number"),
            ("set light NaN", "Invalid value \"NaN\" for light, expected a number"),
        ] {
            let mut state = before;
            let (reply, pin) = run(line, &mut state);
            assert_eq!(reply.as_deref(), Some(expect), "{line}");
            assert_eq!(state, before, "{line}");
            assert_eq!(pin, None);
        }
    }

    #[test]
    fn help_check_and_blank_lines() {
        let mut state = SensorState {
            tank_level: 25,
            ..Default::default()
        };
        let before = state;

        assert_eq!(run("help", &mut state).0.as_deref(), Some(HELP_TEXT));
        let report = run("  check  ", &mut state).0.unwrap();
        assert!(report.contains("Tank Level: 25"));
        assert_eq!(run("   ", &mut state).0, None);
        assert_eq!(state, before);
    }

    #[test]
    fn reset_keeps_chip_temperature() {
        let mut state = SensorState {
            temperature: 30.0,
            motion_detected: true,
            pump_on: true,
            internal_temperature: 44.0,
            ..Default::default()
        };
        run("reset", &mut state);
        assert_eq!(
            state,
            SensorState {
                internal_temperature: 44.0,
                ..Default::default()
            }
        );
    }
}

// EOF
