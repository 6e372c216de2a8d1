//! The process-wide "current time" source.
//!
//! Everything that needs "now" reads [`current_millis`]. Tests swap in a
//! fixed or offset provider; swaps are global, so such tests run serially.

use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tracing::debug;

pub trait MillisProvider: Send + Sync + fmt::Debug {
    fn millis(&self) -> i64;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMillisProvider;

impl MillisProvider for SystemMillisProvider {
    fn millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Always answers the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedMillisProvider(pub i64);

impl MillisProvider for FixedMillisProvider {
    fn millis(&self) -> i64 {
        self.0
    }
}

/// The system clock shifted by a constant.
#[derive(Debug, Clone, Copy)]
pub struct OffsetMillisProvider(pub i64);

impl MillisProvider for OffsetMillisProvider {
    fn millis(&self) -> i64 {
        SystemMillisProvider.millis().saturating_add(self.0)
    }
}

static PROVIDER: LazyLock<RwLock<Arc<dyn MillisProvider>>> =
    LazyLock::new(|| RwLock::new(Arc::new(SystemMillisProvider)));

pub fn current_millis() -> i64 {
    PROVIDER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .millis()
}

pub fn set_current_millis_provider(provider: Arc<dyn MillisProvider>) {
    debug!(provider = ?provider, "swapping current millis provider");
    *PROVIDER.write().unwrap_or_else(PoisonError::into_inner) = provider;
}

pub fn set_current_millis_system() {
    set_current_millis_provider(Arc::new(SystemMillisProvider));
}

pub fn set_current_millis_fixed(millis: i64) {
    set_current_millis_provider(Arc::new(FixedMillisProvider(millis)));
}

/// Makes the clock run `offset` milliseconds ahead of the system clock.
pub fn set_current_millis_offset(offset: i64) {
    if offset == 0 {
        set_current_millis_system();
    } else {
        set_current_millis_provider(Arc::new(OffsetMillisProvider(offset)));
    }
}
