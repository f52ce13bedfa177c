//! ESP-IDF implementations of the monitor's hardware and network traits.

pub mod adc;
pub mod delay;
pub mod http;
pub mod watchdog;
pub mod wifi;
