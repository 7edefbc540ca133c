use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Enforces a fixed minimum gap between consecutive requests.
///
/// With a gap of at least 100ms no one-second window can hold more than ten
/// requests, which is all the SEC asks for; the call volume here is too small to
/// warrant a token bucket.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Sleeps until `interval` has passed since the previous call returned.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            let next = last + self.interval;
            if next > Instant::now() {
                trace!("pacing request for {:?}", next - Instant::now());
            }
            sleep_until(next).await;
        }
        self.last = Some(Instant::now());
    }
}
