//! Rate-limited, best-effort upload of readings to an HTTP endpoint.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::net::{NetworkLink, Transport};
use crate::rms::WindowReading;

const JSON_HEADERS: [(&str, &str); 1] = [("Content-Type", "application/json")];

fn round_to<S: Serializer>(value: f32, decimals: i32, serializer: S) -> Result<S::Ok, S::Error> {
    let scale = 10f64.powi(decimals);
    serializer.serialize_f64((value as f64 * scale).round() / scale)
}

fn three_decimals<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    round_to(*value, 3, serializer)
}

fn one_decimal<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    round_to(*value, 1, serializer)
}

/// Body of a report: `{"current":1.234,"power":283.8}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportPayload {
    /// RMS current in amperes
    #[serde(serialize_with = "three_decimals")]
    pub current: f32,
    /// Real power in watts
    #[serde(serialize_with = "one_decimal")]
    pub power: f32,
}

impl ReportPayload {
    pub fn new(reading: &WindowReading, line_voltage: f32) -> Self {
        Self {
            current: reading.rms_current,
            power: reading.rms_current * line_voltage,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ReportOutcome {
    /// Less than one interval since the last attempt
    NotDue,
    /// Link down, nothing was sent
    Skipped,
    Delivered(u16),
    Rejected(u16),
    Failed,
}

/// Sends at most one report per interval.
///
/// The first report is due one interval after boot. Every attempt moves the schedule
/// forward by a full interval whatever its outcome: failed reports are lost.
pub struct Reporter {
    url: String,
    interval: Duration,
    last_report: Duration,
}

impl Reporter {
    pub fn new(url: impl Into<String>, interval: Duration) -> Self {
        Self {
            url: url.into(),
            interval,
            last_report: Duration::ZERO,
        }
    }

    pub fn last_report(&self) -> Duration {
        self.last_report
    }

    pub fn is_due(&self, now: Duration) -> bool {
        now.saturating_sub(self.last_report) >= self.interval
    }

    pub fn maybe_report(
        &mut self,
        now: Duration,
        payload: &ReportPayload,
        link: &mut impl NetworkLink,
        transport: &mut impl Transport,
    ) -> ReportOutcome {
        if !self.is_due(now) {
            return ReportOutcome::NotDue;
        }
        self.last_report = now;

        if !link.is_connected() {
            log::warn!("WiFi not connected. Skipping report");
            return ReportOutcome::Skipped;
        }

        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Could not encode report: {e}");
                return ReportOutcome::Failed;
            }
        };

        match transport.post(&self.url, &JSON_HEADERS, &body) {
            Ok(status @ 200..=299) => {
                log::info!("POST Success: {status}");
                ReportOutcome::Delivered(status)
            }
            Ok(status) => {
                log::warn!("POST rejected with status {status}");
                ReportOutcome::Rejected(status)
            }
            Err(e) => {
                log::warn!("POST Failed: {e:#}");
                ReportOutcome::Failed
            }
        }
    }
}
