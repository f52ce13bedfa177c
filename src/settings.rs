use std::{num::NonZeroU32, time::Duration};

use crate::sensor::SensorModel;

const fn non_zero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("sample count must be positive"),
    }
}

/// Nominal mains voltage used to turn RMS current into power
pub const LINE_VOLTAGE: f32 = 230.0;

/// A run of evenly spaced samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub samples: NonZeroU32,
    /// Delay after every sample
    pub spacing: Duration,
}

impl Sampling {
    pub(crate) fn spacing_us(&self) -> u32 {
        u32::try_from(self.spacing.as_micros()).unwrap_or(u32::MAX)
    }
}

/// Measurement and reporting parameters, fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorSettings {
    pub sensor: SensorModel,
    /// Zero-current calibration at startup
    pub calibration: Sampling,
    /// One RMS window
    pub window: Sampling,
    /// Pause between two windows
    pub settle_delay: Duration,
    pub report_interval: Duration,
    pub line_voltage: f32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            sensor: SensorModel::default(),
            calibration: Sampling {
                samples: non_zero(1000),
                spacing: Duration::from_micros(500),
            },
            window: Sampling {
                samples: non_zero(1000),
                spacing: Duration::from_micros(1000),
            },
            settle_delay: Duration::from_secs(1),
            report_interval: Duration::from_secs(5 * 60),
            line_voltage: LINE_VOLTAGE,
        }
    }
}
