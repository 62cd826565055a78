use std::fmt;
use std::time::Instant;

/// Injected millisecond clock. Must be monotonically non-decreasing.
pub type Clock = Box<dyn Fn() -> u64>;

/// Milliseconds elapsed since the clock was created.
///
/// The host-side default; embedded ports inject their own tick counter
/// through [`PeerConfig::with_clock`].
pub fn monotonic_clock() -> Clock {
    let start = Instant::now();
    Box::new(move || start.elapsed().as_millis() as u64)
}

/// Tuning knobs for the request/response engine.
pub struct PeerConfig {
    /// Retransmissions allowed per unacknowledged request. Default: 3.
    pub max_retries: u8,
    /// Silence on a pending request before it is retransmitted. Default: 1000.
    pub retry_timeout_ms: u64,
    /// Millisecond clock driving the retry sweep.
    pub clock: Clock,
}

impl PeerConfig {
    /// Config with explicit retry knobs and clock.
    pub fn new(max_retries: u8, retry_timeout_ms: u64, clock: Clock) -> Self {
        Self {
            max_retries,
            retry_timeout_ms,
            clock,
        }
    }

    /// Default retry knobs with an injected clock.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_timeout_ms: 1000,
            clock: monotonic_clock(),
        }
    }
}

impl fmt::Debug for PeerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerConfig")
            .field("max_retries", &self.max_retries)
            .field("retry_timeout_ms", &self.retry_timeout_ms)
            .field("clock", &format_args!("<fn>"))
            .finish()
    }
}
