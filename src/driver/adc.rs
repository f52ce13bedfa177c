use esp_idf_sys::EspError;

use crate::adc::AnalogSource;

/// Oneshot ADC conversions from a single channel.
///
/// Wraps the channel's read function so any ADC unit and pin combination fits. A failed
/// conversion is logged and the previous sample is repeated.
pub struct OneshotSensor<R: FnMut() -> Result<u16, EspError>> {
    read: R,
    last: u16,
}

impl<R: FnMut() -> Result<u16, EspError>> OneshotSensor<R> {
    pub fn new(read: R) -> Self {
        Self { read, last: 0 }
    }
}

impl<R: FnMut() -> Result<u16, EspError>> AnalogSource for OneshotSensor<R> {
    fn read(&mut self) -> u16 {
        match (self.read)() {
            Ok(raw) => self.last = raw,
            Err(e) => log::warn!("ADC read failed: {e}"),
        }
        self.last
    }
}
