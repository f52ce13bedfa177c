#![allow(unexpected_cfgs)]

#[cfg(target_os = "espidf")]
mod config;

#[cfg(target_os = "espidf")]
esp_idf_sys::esp_app_desc! {}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::time::Duration;

    use currentmon::adc::SpikeOverride;
    use currentmon::clock::MonotonicClock;
    use currentmon::driver::{
        adc::OneshotSensor, delay::EspDelay, http::HttpTransport, watchdog::EspWatchdog,
        wifi::WifiLink,
    };
    use currentmon::logger::ConsoleLogger;
    use currentmon::settings::MonitorSettings;
    use currentmon::{Monitor, MonitorPeripherals};
    use esp_idf_hal::adc::attenuation::DB_11;
    use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
    use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
    use esp_idf_hal::gpio::{PinDriver, Pull};
    use esp_idf_hal::peripherals::Peripherals;

    use crate::config::MonitorConfig;

    const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

    esp_idf_svc::sys::link_patches();

    ConsoleLogger::init(log::LevelFilter::Info)?;
    log::info!("Booting...");

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;
    let settings = MonitorSettings::default();

    // Load configuration from NVS / cfg.toml
    let config = MonitorConfig::load()?;
    if config.report_url.is_empty() {
        log::warn!("No report URL configured, reports will fail");
    }

    // ACS712 output on GPIO34, spike simulation button on GPIO27 (active low)
    let adc_config = AdcChannelConfig {
        attenuation: DB_11,
        ..Default::default()
    };
    let mut channel =
        AdcChannelDriver::new(AdcDriver::new(peripherals.adc1)?, pins.gpio34, &adc_config)?;
    let mut button = PinDriver::input(pins.gpio27)?;
    button.set_pull(Pull::Up)?;
    let sensor = SpikeOverride::new(
        OneshotSensor::new(move || channel.read_raw()),
        button,
        settings.sensor.adc_max,
    );

    let link = match &config.sta {
        Some(sta) => Some(WifiLink::connect(peripherals.modem, &sta.ssid, sta.psk.as_deref())?),
        None => {
            log::warn!("No WiFi credentials configured, reports will be skipped");
            None
        }
    };

    let monitor = Monitor::new(
        MonitorPeripherals {
            sensor,
            delay: EspDelay,
            clock: MonotonicClock::new(),
            link,
            transport: HttpTransport::new(HTTP_TIMEOUT),
            watchdog: EspWatchdog,
        },
        settings,
        config.report_url,
    );

    monitor.run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("currentmon is firmware for ESP-IDF targets, build it for an *-espidf target");
}
