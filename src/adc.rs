use embedded_hal::digital::v2::InputPin;

/// A blocking source of raw ADC samples in `[0, ADC_MAX]`.
pub trait AnalogSource {
    fn read(&mut self) -> u16;

    /// Called once before the first read of every estimation window.
    fn begin_window(&mut self) {}
}

/// Wraps a sensor with an active-low override input (a push button with pull-up).
///
/// The input is sampled once per window in [`AnalogSource::begin_window`]. While it
/// was held low at that point every read of the window returns the full-scale value,
/// simulating a current spike without touching the real sensor.
pub struct SpikeOverride<S, P> {
    source: S,
    input: P,
    full_scale: u16,
    asserted: bool,
}

impl<S: AnalogSource, P: InputPin> SpikeOverride<S, P> {
    pub fn new(source: S, input: P, full_scale: u16) -> Self {
        Self {
            source,
            input,
            full_scale,
            asserted: false,
        }
    }

    pub fn is_asserted(&self) -> bool {
        self.asserted
    }
}

impl<S: AnalogSource, P: InputPin> AnalogSource for SpikeOverride<S, P> {
    fn read(&mut self) -> u16 {
        if self.asserted {
            self.full_scale
        } else {
            self.source.read()
        }
    }

    fn begin_window(&mut self) {
        self.asserted = self.input.is_low().unwrap_or(false);
        if self.asserted {
            log::debug!("Override input asserted, simulating spike");
        }
        self.source.begin_window();
    }
}
