#[cfg(test)]
use mockall::automock;

/// Network association status. Connecting and reconnecting are up to the implementation.
#[cfg_attr(test, automock)]
pub trait NetworkLink {
    fn is_connected(&mut self) -> bool;
}

/// Sends a single HTTP POST and returns the response status code.
pub trait Transport {
    fn post(&mut self, url: &str, headers: &[(&str, &str)], body: &[u8]) -> anyhow::Result<u16>;
}

/// A missing link (no Wi-Fi credentials configured) is never connected.
impl<L: NetworkLink> NetworkLink for Option<L> {
    fn is_connected(&mut self) -> bool {
        self.as_mut().is_some_and(|link| link.is_connected())
    }
}
