//! Clock sources.
//!
//! Production code uses [`mockable::DefaultClock`]; [`ManualClock`] is a
//! settable clock for simulations and restart-policy tests.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex};

pub use mockable::DefaultClock;

/// Clock handle shared between the orchestrator and its probe driver.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

pub fn system_clock() -> SharedClock {
    Arc::new(DefaultClock)
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
