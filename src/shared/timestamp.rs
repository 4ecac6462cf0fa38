/// Clock utilities for the engine
///
/// Two distinct time sources, for two distinct jobs:
/// - `arrival_nanos`: monotonic stamps for time priority inside the book.
///   Immune to wall-clock adjustment and strictly increasing across calls,
///   so two submissions can never tie on arrival.
/// - `epoch_nanos`: wall-clock stamps for trade records handed downstream.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Last arrival stamp handed out
static LAST_ARRIVAL: AtomicU64 = AtomicU64::new(0);

fn process_epoch() -> Instant {
    static START: OnceLock<Instant> = OnceLock::new();
    *START.get_or_init(Instant::now)
}

/// Nanoseconds since process start on the monotonic clock
#[inline]
pub fn monotonic_nanos() -> u64 {
    process_epoch().elapsed().as_nanos() as u64
}

/// Strictly increasing arrival stamp
///
/// Reads the monotonic clock and bumps past the previous stamp when the
/// clock has not advanced, so every caller observes a unique, ordered value.
#[inline]
pub fn arrival_nanos() -> u64 {
    let now = monotonic_nanos();
    let mut prev = LAST_ARRIVAL.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_ARRIVAL.compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => prev = observed,
        }
    }
}

/// Wall-clock nanoseconds since the Unix epoch, for trade records
#[inline]
pub fn epoch_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
