//! Conversions from raw ADC counts to volts and amps for a hall-effect
//! current sensor (ACS712-30A by default).

/// Full-scale reading of the 12 bit ADC
pub const ADC_MAX: u16 = 4095;

/// ADC reference voltage
pub const V_REF: f32 = 3.3;

/// ACS712-30A output slope, in volts per ampere
pub const ACS712_SENSITIVITY: f32 = 0.066;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorModel {
    pub adc_max: u16,
    pub v_ref: f32,
    pub sensitivity: f32,
}

impl Default for SensorModel {
    fn default() -> Self {
        Self {
            adc_max: ADC_MAX,
            v_ref: V_REF,
            sensitivity: ACS712_SENSITIVITY,
        }
    }
}

impl SensorModel {
    /// Converts a (possibly averaged) raw reading to volts.
    pub fn voltage(&self, raw: f32) -> f32 {
        raw / self.adc_max as f32 * self.v_ref
    }

    /// Instantaneous current for a sensor voltage, relative to the zero-current voltage.
    pub fn current(&self, voltage: f32, zero_current_voltage: f32) -> f32 {
        (voltage - zero_current_voltage) / self.sensitivity
    }
}
