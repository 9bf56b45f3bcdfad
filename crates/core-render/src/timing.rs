//! Render timing: duration of the last frame per path, in nanoseconds.
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_FULL_NS: AtomicU64 = AtomicU64::new(0);
static LAST_STATUS_NS: AtomicU64 = AtomicU64::new(0);

pub fn record_full_ns(ns: u64) {
    LAST_FULL_NS.store(ns, Ordering::Relaxed);
}

pub fn record_status_ns(ns: u64) {
    LAST_STATUS_NS.store(ns, Ordering::Relaxed);
}

pub fn last_full_ns() -> u64 {
    LAST_FULL_NS.load(Ordering::Relaxed)
}

pub fn last_status_ns() -> u64 {
    LAST_STATUS_NS.load(Ordering::Relaxed)
}

pub(crate) fn elapsed_ns(start: std::time::Instant) -> u64 {
    u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX)
}
