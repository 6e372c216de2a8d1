//! Process-wide defaults: the zone used when none is given.
//!
//! The default zone is resolved lazily on first use and can be overridden
//! or reset at any time.

use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use crate::calendar::{Calendar, Zone};

/// Environment variable naming the default zone, e.g. `Europe/Paris`.
pub const ZONE_ENV: &str = "KALENDS_TZ";

static DEFAULT_ZONE: RwLock<Option<Zone>> = RwLock::new(None);

pub fn default_zone() -> Zone {
    if let Some(zone) = *DEFAULT_ZONE.read().unwrap_or_else(PoisonError::into_inner) {
        return zone;
    }
    let mut slot = DEFAULT_ZONE.write().unwrap_or_else(PoisonError::into_inner);
    *slot.get_or_insert_with(|| {
        let env = std::env::var(ZONE_ENV).ok();
        let host = iana_time_zone::get_timezone()
            .map_err(|err| warn!(error = %err, "cannot determine host time zone"))
            .ok();
        resolve_zone(env.as_deref(), host.as_deref())
    })
}

/// Picks the first usable zone id of `env` then `host`, else UTC.
fn resolve_zone(env: Option<&str>, host: Option<&str>) -> Zone {
    for (source, id) in [("environment", env), ("host", host)] {
        let Some(id) = id else { continue };
        match Zone::for_id(id) {
            Ok(zone) => {
                debug!(source, zone = %zone, "resolved default time zone");
                return zone;
            }
            Err(err) => warn!(source, error = %err, "ignoring unusable time zone"),
        }
    }
    warn!("no usable time zone found, defaulting to UTC");
    Zone::Utc
}

pub fn set_default_zone(zone: Zone) {
    debug!(zone = %zone, "overriding default time zone");
    *DEFAULT_ZONE.write().unwrap_or_else(PoisonError::into_inner) = Some(zone);
}

/// Forgets any override; the next read resolves the zone again.
pub fn reset_default_zone() {
    *DEFAULT_ZONE.write().unwrap_or_else(PoisonError::into_inner) = None;
}

/// ISO in the default zone.
pub fn default_calendar() -> Calendar {
    Calendar::iso(default_zone())
}
