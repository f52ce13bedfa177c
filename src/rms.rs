use embedded_hal::blocking::delay::DelayUs;

use crate::adc::AnalogSource;
use crate::calibration::Baseline;
use crate::sensor::SensorModel;
use crate::settings::Sampling;

/// Result of one sampling window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowReading {
    /// RMS current in amperes, never negative
    pub rms_current: f32,
    /// Mean sensor voltage over the window
    pub voltage: f32,
    /// `voltage` minus the zero-current baseline
    pub offset: f32,
}

/// Samples one window and computes its RMS current.
///
/// Blocks for `sampling.samples * sampling.spacing`.
pub fn estimate_window<S, D>(
    source: &mut S,
    delay: &mut D,
    sensor: &SensorModel,
    baseline: Baseline,
    sampling: &Sampling,
) -> WindowReading
where
    S: AnalogSource,
    D: DelayUs<u32>,
{
    let samples = sampling.samples.get();
    let spacing = sampling.spacing_us();
    let zero = baseline.volts();

    source.begin_window();

    let mut sum_squares = 0.0f32;
    let mut sum_raw: u64 = 0;
    for _ in 0..samples {
        let raw = source.read();
        sum_raw += raw as u64;

        let current = sensor.current(sensor.voltage(raw as f32), zero);
        sum_squares += current * current;

        delay.delay_us(spacing);
    }

    let voltage = sensor.voltage(sum_raw as f32 / samples as f32);
    WindowReading {
        rms_current: (sum_squares / samples as f32).sqrt(),
        voltage,
        offset: voltage - zero,
    }
}
