use std::{thread, time::Duration};

use esp_idf_hal::modem::Modem;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};

use crate::net::NetworkLink;

/// How long startup waits for the first association
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wi-Fi station. When found disconnected it asks the driver to reconnect and
/// reports the link as down for that round.
pub struct WifiLink {
    wifi: Box<EspWifi<'static>>,
}

impl WifiLink {
    /// Associates to `ssid`, waiting up to [`CONNECT_TIMEOUT`]. A timeout is not an
    /// error: the link keeps retrying in the background of [`NetworkLink::is_connected`].
    pub fn connect(
        modem: impl Peripheral<P = Modem> + 'static,
        ssid: &str,
        psk: Option<&str>,
    ) -> anyhow::Result<Self> {
        let mut wifi = Box::new(EspWifi::new(modem, EspSystemEventLoop::take()?, None)?);

        let mut config = ClientConfiguration {
            ssid: ssid
                .try_into()
                .map_err(|_| anyhow::anyhow!("SSID too long: {ssid}"))?,
            ..Default::default()
        };
        if let Some(psk) = psk {
            config.auth_method = AuthMethod::WPA2Personal;
            config.password = psk
                .try_into()
                .map_err(|_| anyhow::anyhow!("Wi-Fi password too long"))?;
        }
        wifi.set_configuration(&Configuration::Client(config))?;
        wifi.start()?;

        log::info!("Connecting to WiFi network {ssid}");
        wifi.connect()?;

        let mut waited = Duration::ZERO;
        while !wifi.is_connected()? {
            if waited >= CONNECT_TIMEOUT {
                log::warn!("WiFi not connected after {}s, continuing", waited.as_secs());
                break;
            }
            thread::sleep(Duration::from_millis(500));
            waited += Duration::from_millis(500);
        }
        if wifi.is_connected()? {
            log::info!("WiFi connected");
        }

        Ok(Self { wifi })
    }
}

impl NetworkLink for WifiLink {
    fn is_connected(&mut self) -> bool {
        match self.wifi.is_connected() {
            Ok(true) => true,
            Ok(false) => {
                if let Err(e) = self.wifi.connect() {
                    log::warn!("WiFi reconnect failed: {e}");
                }
                false
            }
            Err(e) => {
                log::warn!("Could not read WiFi status: {e}");
                false
            }
        }
    }
}
