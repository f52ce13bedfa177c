#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait Watchdog {
    /// Starts supervising the calling task.
    fn arm(&self, timeout: std::time::Duration);
    fn feed(&self);
}
