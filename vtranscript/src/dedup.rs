//! Per-speaker suppression of identical text seen within a short window.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEDUP_WINDOW: Duration = Duration::from_secs(5);

/// Monotonic time source used for dedup decisions.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// ```rust
/// use std::time::Duration;
/// use vtranscript::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(2));
/// assert_eq!(clock.now() - start, Duration::from_secs(2));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone)]
pub struct DedupCache {
    window: Duration,
    seen: HashMap<String, Instant>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::with_window(DEDUP_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            seen: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Returns `true` when `text` was recorded less than one window before `now`.
    ///
    /// A duplicate hit does not refresh the stored timestamp. Expired entries
    /// are purged on every call.
    pub fn check_and_record(&mut self, text: &str, now: Instant) -> bool {
        let window = self.window;
        self.seen
            .retain(|_, seen_at| now.saturating_duration_since(*seen_at) <= window);

        if let Some(seen_at) = self.seen.get(text)
            && now.saturating_duration_since(*seen_at) < window
        {
            return true;
        }

        self.seen.insert(text.to_string(), now);
        false
    }
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new()
    }
}
