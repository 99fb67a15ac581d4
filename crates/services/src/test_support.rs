//! In-process fakes shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, TimeZone};
use domains::{Clock, DomainError, KeyValueStore, Result};

#[derive(Default)]
pub struct MapStore {
    values: Mutex<HashMap<String, String>>,
    full: AtomicBool,
}

impl MapStore {
    /// Makes every subsequent `set` fail the way a full browser store does.
    pub fn fill_up(&self) {
        self.full.store(true, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl KeyValueStore for MapStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.full.load(Ordering::SeqCst) {
            return Err(DomainError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A clock that only moves when told to.
pub struct StepClock {
    now: Mutex<DateTime<Local>>,
}

impl StepClock {
    pub fn new() -> Arc<Self> {
        let start = Local
            .with_ymd_and_hms(2024, 5, 1, 14, 3, 22)
            .single()
            .unwrap();
        Arc::new(Self {
            now: Mutex::new(start),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}
