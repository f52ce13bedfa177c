//! Fakes shared by the unit tests.

use std::{
    cell::Cell,
    collections::VecDeque,
    rc::Rc,
    time::Duration,
};

use embedded_hal::{
    blocking::delay::{DelayMs, DelayUs},
    digital::v2::InputPin,
};

use crate::{adc::AnalogSource, clock::Clock, net::Transport};

pub struct ConstantSource(pub u16);

impl AnalogSource for ConstantSource {
    fn read(&mut self) -> u16 {
        self.0
    }
}

/// Repeats a sequence of samples forever
pub struct SequenceSource {
    samples: Vec<u16>,
    reads: usize,
}

impl SequenceSource {
    pub fn new(samples: &[u16]) -> Self {
        Self {
            samples: samples.to_vec(),
            reads: 0,
        }
    }

    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl AnalogSource for SequenceSource {
    fn read(&mut self) -> u16 {
        let sample = self.samples[self.reads % self.samples.len()];
        self.reads += 1;
        sample
    }
}

/// Shared fake time: delays advance the clock instead of blocking.
#[derive(Clone, Default)]
pub struct FakeTime(Rc<Cell<Duration>>);

impl FakeTime {
    pub fn elapsed(&self) -> Duration {
        self.0.get()
    }

    fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl DelayUs<u32> for FakeTime {
    fn delay_us(&mut self, us: u32) {
        self.advance(Duration::from_micros(us as u64));
    }
}

impl DelayMs<u32> for FakeTime {
    fn delay_ms(&mut self, ms: u32) {
        self.advance(Duration::from_millis(ms as u64));
    }
}

impl Clock for FakeTime {
    fn uptime(&self) -> Duration {
        self.elapsed()
    }
}

/// Input pin returning a scripted sequence of levels, the last one repeating.
pub struct FakePin {
    levels: Vec<bool>,
    position: Cell<usize>,
    failing: bool,
}

impl FakePin {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.to_vec(),
            position: Cell::new(0),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            levels: vec![false],
            position: Cell::new(0),
            failing: true,
        }
    }
}

impl InputPin for FakePin {
    type Error = ();

    fn is_high(&self) -> Result<bool, ()> {
        if self.failing {
            return Err(());
        }
        let i = self.position.get();
        self.position.set(i + 1);
        Ok(self.levels[i.min(self.levels.len() - 1)])
    }

    fn is_low(&self) -> Result<bool, ()> {
        self.is_high().map(|high| !high)
    }
}

#[derive(Debug, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Records every request and answers with scripted responses, then 200.
#[derive(Default)]
pub struct RecordingTransport {
    pub requests: Vec<RecordedRequest>,
    responses: VecDeque<Result<u16, String>>,
}

impl RecordingTransport {
    pub fn with_responses(responses: Vec<Result<u16, String>>) -> Self {
        Self {
            requests: Vec::new(),
            responses: responses.into(),
        }
    }
}

impl Transport for RecordingTransport {
    fn post(&mut self, url: &str, headers: &[(&str, &str)], body: &[u8]) -> anyhow::Result<u16> {
        self.requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_vec(),
        });
        match self.responses.pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(e)) => Err(anyhow::anyhow!(e)),
            None => Ok(200),
        }
    }
}
