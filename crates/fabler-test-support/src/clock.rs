//! Test clock — a `Clock` that always returns a fixed instant.

use chrono::{DateTime, Utc};
use fabler_core::clock::Clock;

/// Clock returning the wrapped instant on every call.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
