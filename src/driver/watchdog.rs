use esp_idf_sys::*;

use crate::watchdog::Watchdog;

pub struct EspWatchdog;

impl Watchdog for EspWatchdog {
    fn arm(&self, timeout: std::time::Duration) {
        let config = esp_task_wdt_config_t {
            timeout_ms: timeout.as_millis() as u32,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // The task watchdog may already be running from the default sdkconfig
        let result = esp!(unsafe { esp_task_wdt_init(&config) })
            .or_else(|_| esp!(unsafe { esp_task_wdt_reconfigure(&config) }))
            .and_then(|_| esp!(unsafe { esp_task_wdt_add(std::ptr::null_mut()) }));
        if let Err(e) = result {
            log::warn!("Could not arm task watchdog: {e}");
        }
    }

    fn feed(&self) {
        unsafe { esp_task_wdt_reset() };
    }
}
