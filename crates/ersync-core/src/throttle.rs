//! Minimum-interval request throttle

use std::thread;
use std::time::{Duration, Instant};

/// Enforces a minimum interval between consecutive API requests.
///
/// [`pause`](Self::pause) is called before every request. The first request
/// after construction also waits the full interval.
#[derive(Debug, Clone)]
pub struct RequestThrottle {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RequestThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Block until the next request may be sent. Returns how long it slept.
    pub fn pause(&mut self) -> Duration {
        let wait = match self.last_request {
            None => self.min_interval,
            Some(last) => self.min_interval.saturating_sub(last.elapsed()),
        };
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        self.last_request = Some(Instant::now());
        wait
    }
}
