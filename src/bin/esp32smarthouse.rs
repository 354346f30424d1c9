// bin/esp32smarthouse.rs

#![warn(clippy::large_futures)]

#[cfg(target_os = "espidf")]
use device::run;

#[cfg(not(target_os = "espidf"))]
fn run() -> anyhow::Result<()> {
    anyhow::bail!("esp32smarthouse only runs on the ESP32, build it for target_os = \"espidf\"")
}

fn main() -> anyhow::Result<()> {
    run()
}

#[cfg(target_os = "espidf")]
mod device {
    use std::{io, sync::Arc, time::Duration};

    use esp32smarthouse::*;
    use esp_idf_hal::{
        delay::{Ets, FreeRtos},
        gpio::{AnyIOPin, PinDriver},
        i2c::{I2cConfig, I2cDriver},
        peripherals::Peripherals,
        uart::{config::Config as UartConfig, UartDriver},
        units::Hertz,
    };
    use esp_idf_svc::{eventloop::EspSystemEventLoop, nvs, timer::EspTaskTimerService, wifi::WifiDriver};
    use esp_idf_sys::{esp, esp_app_desc};
    use log::*;

    const LCD_I2C_HZ: u32 = 100_000;

    esp_app_desc!();

    pub fn run() -> anyhow::Result<()> {
        esp_idf_sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();

        // eventfd is needed by our mio poll implementation.  Note you should set max_fds
        // higher if you have other code that may need eventfd.
        #[allow(clippy::needless_update)]
        let eventfd_config = esp_idf_sys::esp_vfs_eventfd_config_t {
            max_fds: 1,
            ..Default::default()
        };
        esp! { unsafe { esp_idf_sys::esp_vfs_eventfd_register(&eventfd_config) } }?;

        FreeRtos::delay_ms(1000);
        info!("[ESP32 Smart House Interface] Ready");

        let config = MyConfig::default();
        info!("My config:\n{config:#?}");

        let sysloop = EspSystemEventLoop::take()?;
        let timer = EspTaskTimerService::new()?;
        let nvs_default_partition = nvs::EspDefaultNvsPartition::take()?;

        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        let i2c = I2cDriver::new(
            peripherals.i2c0,
            pins.gpio21,
            pins.gpio22,
            &I2cConfig::new().baudrate(Hertz(LCD_I2C_HZ)),
        )?;
        let mut lcd = Lcd::new(i2c, Ets, config.lcd_addr);
        if let Err(e) = lcd.init() {
            // keep going, the dashboard works without the panel
            error!("LCD init failed: {e:?}");
        }

        let feed = UartDriver::new(
            peripherals.uart2,
            pins.gpio17,
            pins.gpio16,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &UartConfig::new().baudrate(Hertz(config.feed_baud)),
        )?;
        let console = UartDriver::new(
            peripherals.uart0,
            pins.gpio1,
            pins.gpio3,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &UartConfig::new().baudrate(Hertz(config.console_baud)),
        )?;

        let mut alarm = PinDriver::output(pins.gpio25)?;
        alarm.set_low()?;

        let wifidriver = WifiDriver::new(
            peripherals.modem,
            sysloop.clone(),
            Some(nvs_default_partition),
        )?;

        let (publisher, data) = watch::channel(SensorReport::default());
        let shared_state = Arc::new(Box::pin(MyState::new(config.clone(), data)));

        let controller = Controller::new(
            Board {
                feed,
                console,
                console_out: io::stdout(),
                thermometer: ChipThermometer,
                display: lcd,
                alarm,
            },
            &config,
            publisher,
        );
        let period = Duration::from_millis(config.loop_delay_ms);

        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(Box::pin(async move {
                let wifi_loop = WifiLoop {
                    state: shared_state.clone(),
                    wifi: None,
                };

                info!("Entering main loop...");
                tokio::select! {
                    _ = Box::pin(controller.run(period)) => { error!("controller.run() ended."); }
                    _ = Box::pin(run_api_server(shared_state.clone())) => { error!("run_api_server() ended."); }
                    _ = Box::pin(wifi_loop.run(wifidriver, sysloop, timer)) => { error!("wifi_loop.run() ended."); }
                };
            }));

        // not actually returning from main() but we reboot instead
        info!("main() finished, reboot.");
        FreeRtos::delay_ms(3000);
        esp_idf_hal::reset::restart();
    }
}

// EOF
