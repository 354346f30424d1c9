// lcd.rs

//! 16x2 HD44780 character display behind a PCF8574 I2C expander.
//!
//! Expander bits: P0 = RS, P1 = RW, P2 = EN, P3 = backlight, P4..P7 = D4..D7.

use std::fmt::Write;

use anyhow::anyhow;
use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::*;

pub const LCD_COLS: usize = 16;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_INCREMENT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0c;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

const TANK_OVERFLOW: &str = "Tank:---% ";

/// What the panel should show, one string per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LcdFrame {
    pub lines: [heapless::String<LCD_COLS>; 2],
}

impl LcdFrame {
    pub fn from_state(state: &SensorState) -> Self {
        let mut top: heapless::String<LCD_COLS> = heapless::String::new();
        if write!(top, "Tank:{}% ", state.tank_level).is_err() {
            // too wide for the panel, never show a cut-off number
            top.clear();
            top.push_str(TANK_OVERFLOW).ok();
        }

        let mut bottom: heapless::String<LCD_COLS> = heapless::String::new();
        bottom
            .push_str(if state.needs_watering { "Watering!" } else { "Dry!   " })
            .ok();

        LcdFrame { lines: [top, bottom] }
    }
}

pub trait StatusDisplay {
    fn show(&mut self, frame: &LcdFrame) -> anyhow::Result<()>;
}

pub struct Lcd<I, D> {
    i2c: I,
    delay: D,
    addr: u8,
    backlight: u8,
}

impl<I: I2c, D: DelayNs> Lcd<I, D> {
    pub fn new(i2c: I, delay: D, addr: u8) -> Self {
        Lcd {
            i2c,
            delay,
            addr,
            backlight: BACKLIGHT,
        }
    }

    /// Power-on sequence for 4-bit mode, see the HD44780 datasheet fig. 24.
    pub fn init(&mut self) -> Result<(), I::Error> {
        self.delay.delay_ms(50);
        self.i2c.write(self.addr, &[self.backlight])?;

        for wait_us in [4500, 4500, 150] {
            self.write_nibble(0x30, 0)?;
            self.delay.delay_us(wait_us);
        }
        self.write_nibble(0x20, 0)?;

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_INCREMENT)
    }

    pub fn clear(&mut self) -> Result<(), I::Error> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), I::Error> {
        let offset = ROW_OFFSETS[usize::from(row) % ROW_OFFSETS.len()];
        self.command(CMD_SET_DDRAM | (offset + col))
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), I::Error> {
        self.backlight = if on { BACKLIGHT } else { 0 };
        self.i2c.write(self.addr, &[self.backlight])
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), I::Error> {
        s.bytes().try_for_each(|b| self.send(b, RS))
    }

    fn command(&mut self, cmd: u8) -> Result<(), I::Error> {
        self.send(cmd, 0)
    }

    fn send(&mut self, byte: u8, mode: u8) -> Result<(), I::Error> {
        self.write_nibble(byte & 0xf0, mode)?;
        self.write_nibble(byte << 4, mode)
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), I::Error> {
        let data = nibble | mode | self.backlight;
        self.i2c.write(self.addr, &[data | EN])?;
        self.delay.delay_us(1);
        self.i2c.write(self.addr, &[data])?;
        self.delay.delay_us(50);
        Ok(())
    }
}

impl<I: I2c, D: DelayNs> StatusDisplay for Lcd<I, D> {
    fn show(&mut self, frame: &LcdFrame) -> anyhow::Result<()> {
        let mut draw = || -> Result<(), I::Error> {
            self.clear()?;
            for (row, line) in (0u8..).zip(frame.lines.iter()) {
                self.set_cursor(0, row)?;
                self.write_str(line)?;
            }
            Ok(())
        };
        draw().map_err(|e| anyhow!("LCD write failed: {e:?}"))
    }
}


// EOF
