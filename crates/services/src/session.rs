//! # Admin Session Guard
//!
//! Two stored values decide whether the admin is logged in: the
//! `adminLoggedIn` flag and the `loginTime` instant (epoch millis as a
//! string). Every successful check slides the window forward.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone};
use domains::{Clock, DomainError, Result, SESSION_TTL_MINUTES};
use tracing::{debug, info};

use crate::persistence::{keys, PersistentStore};

pub struct AdminSession {
    store: PersistentStore,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl AdminSession {
    pub fn new(store: PersistentStore, clock: Arc<dyn Clock>, ttl_minutes: i64) -> Self {
        Self {
            store,
            clock,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn with_default_ttl(store: PersistentStore, clock: Arc<dyn Clock>) -> Self {
        Self::new(store, clock, SESSION_TTL_MINUTES)
    }

    pub fn login(&self) -> Result<()> {
        self.store.set_raw(keys::ADMIN_LOGGED_IN, "true")?;
        self.touch()?;
        info!("Admin logged in");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::ADMIN_LOGGED_IN)?;
        self.store.remove(keys::LOGIN_TIME)?;
        Ok(())
    }

    /// Passes while the flag is set and the last activity is at most the
    /// TTL ago, refreshing the instant. Otherwise both values are cleared.
    pub fn check(&self) -> Result<()> {
        let logged_in = self.store.get_raw(keys::ADMIN_LOGGED_IN)?.as_deref() == Some("true");
        let login_ms = self.login_millis()?.unwrap_or(0);
        let elapsed = self.clock.now().timestamp_millis().saturating_sub(login_ms);

        // Valid only for 0 <= elapsed <= ttl; a future instant is invalid too.
        if !logged_in || !(0..=self.ttl.num_milliseconds()).contains(&elapsed) {
            let reason = if logged_in {
                "session expired"
            } else {
                "not logged in"
            };
            debug!(reason, "Admin session rejected");
            self.logout()?;
            return Err(DomainError::Unauthorized(reason.to_string()));
        }

        self.touch()
    }

    /// The last recorded admin activity.
    pub fn last_login(&self) -> Option<DateTime<Local>> {
        let ms = self.login_millis().ok().flatten()?;
        Local.timestamp_millis_opt(ms).single()
    }

    fn touch(&self) -> Result<()> {
        let now_ms = self.clock.now().timestamp_millis();
        self.store.set_raw(keys::LOGIN_TIME, &now_ms.to_string())
    }

    fn login_millis(&self) -> Result<Option<i64>> {
        Ok(self
            .store
            .get_raw(keys::LOGIN_TIME)?
            .and_then(|raw| raw.trim().parse::<i64>().ok()))
    }
}
