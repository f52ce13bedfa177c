use embedded_hal::blocking::delay::DelayUs;

use crate::adc::AnalogSource;
use crate::sensor::SensorModel;
use crate::settings::Sampling;

/// Sensor output voltage with no current flowing.
///
/// Only [`calibrate`] creates one, and the monitor keeps it for the rest of its life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline(f32);

impl Baseline {
    pub fn volts(&self) -> f32 {
        self.0
    }
}

/// Averages `sampling.samples` reads into the zero-current voltage.
///
/// The caller must guarantee that no current flows through the sensor while this
/// runs. Nothing checks it: a loaded line or a disconnected sensor produce a biased
/// baseline that every later reading inherits.
pub fn calibrate<S, D>(
    source: &mut S,
    delay: &mut D,
    sensor: &SensorModel,
    sampling: &Sampling,
) -> Baseline
where
    S: AnalogSource,
    D: DelayUs<u32>,
{
    let samples = sampling.samples.get();
    let spacing = sampling.spacing_us();

    let mut sum: u64 = 0;
    for _ in 0..samples {
        sum += source.read() as u64;
        delay.delay_us(spacing);
    }

    let mean = sum as f32 / samples as f32;
    Baseline(sensor.voltage(mean))
}

#[cfg(test)]
impl Baseline {
    pub(crate) fn from_volts(volts: f32) -> Self {
        Self(volts)
    }
}
