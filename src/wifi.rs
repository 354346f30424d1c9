// wifi.rs

use anyhow::anyhow;
use embedded_svc::wifi::{AccessPointConfiguration, AuthMethod, Configuration};
use esp_idf_svc::{
    eventloop::{EspEventLoop, System},
    netif::{EspNetif, NetifStack},
    timer::{EspTimerService, Task},
    wifi::{AsyncWifi, EspWifi, WifiDriver},
};

use crate::*;

/// Keeps the always-on access point running.
pub struct WifiLoop<'a> {
    pub state: Arc<Pin<Box<MyState>>>,
    pub wifi: Option<AsyncWifi<EspWifi<'a>>>,
}

impl<'a> WifiLoop<'a> {
    pub async fn run(
        mut self,
        wifidriver: WifiDriver<'a>,
        sysloop: EspEventLoop<System>,
        timer: EspTimerService<Task>,
    ) -> anyhow::Result<()> {
        info!("Initializing Wi-Fi access point...");

        let espwifi = EspWifi::wrap_all(
            wifidriver,
            EspNetif::new(NetifStack::Sta)?,
            EspNetif::new(NetifStack::Ap)?,
        )?;
        self.wifi = Some(AsyncWifi::wrap(espwifi, sysloop, timer)?);

        Box::pin(self.configure()).await?;

        let wifi = self.wifi.as_ref().ok_or_else(|| anyhow!("no wifi"))?;
        let ip_info = wifi.wifi().ap_netif().get_ip_info()?;
        info!("AP IP address: {}", ip_info.ip);
        *self.state.ap_up.write().await = true;

        self.stay_up().await
    }

    pub async fn configure(&mut self) -> anyhow::Result<()> {
        let config = &self.state.config;
        info!("WiFi setting up AP {:?}...", config.ap_ssid);
        let wifi = self.wifi.as_mut().ok_or_else(|| anyhow!("no wifi"))?;
        wifi.set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
            ssid: config
                .ap_ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("AP ssid too long"))?,
            password: config
                .ap_pass
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("AP password too long"))?,
            auth_method: AuthMethod::WPA2Personal,
            channel: config.ap_channel,
            ..Default::default()
        }))?;

        info!("WiFi driver starting...");
        Box::pin(wifi.start()).await?;

        info!("WiFi waiting for netif...");
        Ok(Box::pin(wifi.wait_netif_up()).await?)
    }

    async fn stay_up(mut self) -> anyhow::Result<()> {
        let wifi = self.wifi.as_mut().ok_or_else(|| anyhow!("no wifi"))?;
        loop {
            sleep(Duration::from_secs(30)).await;

            if !wifi.is_started()? {
                error!("WiFi AP stopped, restarting it...");
                *self.state.ap_up.write().await = false;
                Box::pin(wifi.start()).await?;
                *self.state.ap_up.write().await = true;
            }
        }
    }
}

// EOF
