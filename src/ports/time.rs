use std::time::Duration;

use time::OffsetDateTime;

/// Wall clock and timers, injectable so badge expiry can be driven by tests.
pub trait TimeProvider: Clone + Send + Sync + 'static {
    type Sleep<'a>: Future<Output = ()> + Send + 'a
    where
        Self: 'a;

    fn now(&self) -> OffsetDateTime;
    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a>;

    /// The instant `duration` from now; `now` itself if that overflows.
    fn deadline(&self, duration: Duration) -> OffsetDateTime {
        let now = self.now();
        time::Duration::try_from(duration)
            .ok()
            .and_then(|offset| now.checked_add(offset))
            .unwrap_or(now)
    }
}
