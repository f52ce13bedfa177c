use std::time::Duration;

use adc::AnalogSource;
use calibration::{calibrate, Baseline};
use clock::Clock;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use net::{NetworkLink, Transport};
use report::{ReportPayload, Reporter};
use rms::{estimate_window, WindowReading};
use settings::MonitorSettings;
use watchdog::Watchdog;

pub mod adc;
pub mod calibration;
pub mod clock;
pub mod logger;
pub mod net;
pub mod report;
pub mod rms;
pub mod sensor;
pub mod settings;
pub mod watchdog;

#[cfg(target_os = "espidf")]
pub mod driver;

#[cfg(test)]
mod testing;

/// Covers one window, the settle delay and a slow POST
pub const WATCHDOG_TIMEOUT: Duration = Duration::from_secs(30);

pub struct MonitorPeripherals<S, D, C, L, T, W>
where
    S: AnalogSource,
    D: DelayUs<u32> + DelayMs<u32>,
    C: Clock,
    L: NetworkLink,
    T: Transport,
    W: Watchdog,
{
    /// Current sensor, usually wrapped in a [`adc::SpikeOverride`]
    pub sensor: S,
    pub delay: D,
    pub clock: C,
    pub link: L,
    pub transport: T,
    pub watchdog: W,
}

#[derive(PartialEq, Debug, Copy, Clone)]
pub enum MonitorState {
    Calibrating,
    Reporting(Baseline),
}

pub struct Monitor<S, D, C, L, T, W>
where
    S: AnalogSource,
    D: DelayUs<u32> + DelayMs<u32>,
    C: Clock,
    L: NetworkLink,
    T: Transport,
    W: Watchdog,
{
    peripherals: MonitorPeripherals<S, D, C, L, T, W>,
    settings: MonitorSettings,
    reporter: Reporter,
    state: MonitorState,
}

impl<S, D, C, L, T, W> Monitor<S, D, C, L, T, W>
where
    S: AnalogSource,
    D: DelayUs<u32> + DelayMs<u32>,
    C: Clock,
    L: NetworkLink,
    T: Transport,
    W: Watchdog,
{
    pub fn new(
        peripherals: MonitorPeripherals<S, D, C, L, T, W>,
        settings: MonitorSettings,
        report_url: impl Into<String>,
    ) -> Self {
        Self {
            reporter: Reporter::new(report_url, settings.report_interval),
            peripherals,
            settings,
            state: MonitorState::Calibrating,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Runs one iteration: calibration on the first call, a sampling window after that.
    pub fn step(&mut self) -> Option<WindowReading> {
        match self.state {
            MonitorState::Calibrating => {
                self.calibrate();
                None
            }
            MonitorState::Reporting(baseline) => Some(self.measure(baseline)),
        }
    }

    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }

    fn calibrate(&mut self) {
        log::info!(
            "Calibrating zero-current voltage over {} samples, keep the line unloaded",
            self.settings.calibration.samples
        );
        let baseline = calibrate(
            &mut self.peripherals.sensor,
            &mut self.peripherals.delay,
            &self.settings.sensor,
            &self.settings.calibration,
        );
        log::info!("Calibrated Zero-Current Voltage: {:.4} V", baseline.volts());

        self.peripherals.watchdog.arm(WATCHDOG_TIMEOUT);
        self.state = MonitorState::Reporting(baseline);
    }

    fn measure(&mut self, baseline: Baseline) -> WindowReading {
        let p = &mut self.peripherals;
        p.watchdog.feed();

        let reading = estimate_window(
            &mut p.sensor,
            &mut p.delay,
            &self.settings.sensor,
            baseline,
            &self.settings.window,
        );
        let payload = ReportPayload::new(&reading, self.settings.line_voltage);

        let raw = p.sensor.read();
        log::info!(
            "ADC: {} | Voltage: {:.3} V | Offset: {:.3} V | RMS Current: {:.3} A | Power: {:.1} W",
            raw,
            reading.voltage,
            reading.offset,
            reading.rms_current,
            payload.power
        );

        self.reporter
            .maybe_report(p.clock.uptime(), &payload, &mut p.link, &mut p.transport);

        let settle_ms = u32::try_from(self.settings.settle_delay.as_millis()).unwrap_or(u32::MAX);
        p.delay.delay_ms(settle_ms);

        reading
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::net::MockNetworkLink;
    use crate::settings::Sampling;
    use crate::testing::{FakeTime, RecordingTransport, SequenceSource};
    use crate::watchdog::MockWatchdog;

    type TestMonitor =
        Monitor<SequenceSource, FakeTime, FakeTime, MockNetworkLink, RecordingTransport, MockWatchdog>;

    fn settings() -> MonitorSettings {
        MonitorSettings {
            calibration: Sampling {
                samples: NonZeroU32::new(4).unwrap(),
                spacing: Duration::from_micros(500),
            },
            window: Sampling {
                samples: NonZeroU32::new(10).unwrap(),
                spacing: Duration::from_millis(1),
            },
            settle_delay: Duration::from_secs(1),
            report_interval: Duration::from_secs(5),
            ..Default::default()
        }
    }

    fn monitor(samples: &[u16], link: MockNetworkLink, watchdog: MockWatchdog) -> (TestMonitor, FakeTime) {
        let time = FakeTime::default();
        let peripherals = MonitorPeripherals {
            sensor: SequenceSource::new(samples),
            delay: time.clone(),
            clock: time.clone(),
            link,
            transport: RecordingTransport::default(),
            watchdog,
        };
        (Monitor::new(peripherals, settings(), "http://example.com/readings"), time)
    }

    fn connected() -> MockNetworkLink {
        let mut link = MockNetworkLink::new();
        link.expect_is_connected().return_const(true);
        link
    }

    fn relaxed_watchdog() -> MockWatchdog {
        let mut watchdog = MockWatchdog::new();
        watchdog.expect_arm().return_const(());
        watchdog.expect_feed().return_const(());
        watchdog
    }

    #[test]
    fn calibrates_before_measuring() {
        let (mut monitor, time) = monitor(&[2048], connected(), relaxed_watchdog());
        assert_eq!(monitor.state(), MonitorState::Calibrating);

        assert_eq!(monitor.step(), None);

        let expected = Baseline::from_volts(MonitorSettings::default().sensor.voltage(2048.0));
        assert_eq!(monitor.state(), MonitorState::Reporting(expected));
        assert_eq!(monitor.peripherals.sensor.reads(), 4);
        assert_eq!(time.elapsed(), Duration::from_millis(2));

        let reading = monitor.step().unwrap();
        assert!(reading.rms_current.abs() < 1e-4);
        assert_eq!(monitor.state(), MonitorState::Reporting(expected));
    }

    #[test]
    fn baseline_comes_from_the_first_samples() {
        // Four quiescent samples, then a constant load
        let mut samples = vec![2048; 4];
        samples.extend([2134; 11]);
        let (mut monitor, _) = monitor(&samples, connected(), relaxed_watchdog());

        monitor.step();
        let reading = monitor.step().unwrap();

        let sensor = MonitorSettings::default().sensor;
        let expected = sensor
            .current(sensor.voltage(2134.0), sensor.voltage(2048.0))
            .abs();
        assert!((reading.rms_current - expected).abs() < 1e-3);
        assert_eq!(monitor.peripherals.sensor.reads(), 4 + 10 + 1);
    }

    #[test]
    fn watchdog_armed_after_calibration_and_fed_every_window() {
        let mut watchdog = MockWatchdog::new();
        watchdog
            .expect_arm()
            .withf(|timeout| *timeout == WATCHDOG_TIMEOUT)
            .once()
            .return_const(());
        watchdog.expect_feed().times(3).return_const(());
        let (mut monitor, _) = monitor(&[2048], connected(), watchdog);

        for _ in 0..4 {
            monitor.step();
        }
    }

    #[test]
    fn reports_once_per_interval() {
        let (mut monitor, time) = monitor(&[2048, 2200], connected(), relaxed_watchdog());

        monitor.step();
        // Each window takes 10ms plus a 1s settle delay
        for _ in 0..12 {
            monitor.step();
        }

        let requests = &monitor.peripherals.transport.requests;
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.url == "http://example.com/readings"));
        assert_eq!(monitor.reporter.last_report(), Duration::from_millis(10_112));
        assert_eq!(time.elapsed(), Duration::from_millis(2 + 12 * 1010));
    }

    #[test]
    fn keeps_measuring_without_network() {
        let mut link = MockNetworkLink::new();
        link.expect_is_connected().return_const(false);
        let (mut monitor, _) = monitor(&[2048], link, relaxed_watchdog());

        monitor.step();
        for _ in 0..20 {
            assert!(monitor.step().is_some());
        }

        assert!(monitor.peripherals.transport.requests.is_empty());
    }
}
