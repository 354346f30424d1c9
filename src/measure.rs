// measure.rs

pub trait Thermometer {
    fn read_celsius(&mut self) -> anyhow::Result<f32>;
}

#[cfg(target_os = "espidf")]
pub use chip::ChipThermometer;

#[cfg(target_os = "espidf")]
mod chip {
    use anyhow::bail;

    use super::Thermometer;

    // Undocumented ROM/phy helper on the original ESP32, reports Fahrenheit.
    extern "C" {
        fn temprature_sens_read() -> u8;
    }

    // the sensor answers 128 when it is not powered up yet
    const NOT_READY: u8 = 128;

    pub struct ChipThermometer;

    impl Thermometer for ChipThermometer {
        fn read_celsius(&mut self) -> anyhow::Result<f32> {
            let raw = unsafe { temprature_sens_read() };
            if raw == NOT_READY {
                bail!("internal temperature sensor not ready");
            }
            Ok((f32::from(raw) - 32.0) / 1.8)
        }
    }
}

// EOF
