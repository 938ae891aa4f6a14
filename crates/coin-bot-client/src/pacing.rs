//! Outbound move pacing

use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Spaces consecutive publishes at least `interval` apart
///
/// Only the caller awaiting [`Pacer::ready`] waits; message intake and other
/// players keep running.
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

    /// A pacer that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next publish is allowed, then claim the slot
    pub async fn ready(&mut self) {
        if !self.interval.is_zero() {
            if let Some(last) = self.last {
                sleep_until(last + self.interval).await;
            }
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_publish_is_immediate() {
        let mut pacer = Pacer::new(Duration::from_millis(500));
        let start = Instant::now();
        pacer.ready().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spacing_between_publishes() {
        let mut pacer = Pacer::new(Duration::from_millis(500));
        let start = Instant::now();

        pacer.ready().await;
        pacer.ready().await;
        pacer.ready().await;

        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(start.elapsed() < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_when_interval_already_passed() {
        let mut pacer = Pacer::new(Duration::from_millis(500));
        pacer.ready().await;
        tokio::time::sleep(Duration::from_secs(2)).await;

        let before = Instant::now();
        pacer.ready().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled() {
        let mut pacer = Pacer::disabled();
        let start = Instant::now();
        for _ in 0..10 {
            pacer.ready().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
