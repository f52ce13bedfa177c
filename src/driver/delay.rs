use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use esp_idf_hal::delay::{Ets, FreeRtos};

/// Busy-waits for sample spacing and yields to the scheduler for longer pauses.
pub struct EspDelay;

impl DelayUs<u32> for EspDelay {
    fn delay_us(&mut self, us: u32) {
        Ets::delay_us(us);
    }
}

impl DelayMs<u32> for EspDelay {
    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}
