//! Cache metrics descriptions
//!
//! Counters are recorded through the `metrics` facade and are no-ops until the
//! embedding application installs a recorder.

use metrics::{describe_counter, gauge};

pub const CACHE_HITS: &str = "meta_cache_hits_total";
pub const CACHE_MISSES: &str = "meta_cache_misses_total";
pub const CACHE_FETCHES: &str = "meta_cache_fetches_total";
pub const CACHE_WAIT_TIMEOUTS: &str = "meta_cache_wait_timeouts_total";

/// Registers help text for every cache metric
pub fn describe_metrics() {
    describe_counter!(CACHE_HITS, "Lookups served from memory");
    describe_counter!(CACHE_MISSES, "Lookups that triggered a remote fetch");
    describe_counter!(
        CACHE_FETCHES,
        "Completed remote fetches, labelled by outcome (success, error, unresolved)"
    );
    describe_counter!(
        CACHE_WAIT_TIMEOUTS,
        "Waits on another caller's in-flight fetch that hit the timeout"
    );

    gauge!("meta_cache_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_metrics_without_recorder() {
        describe_metrics();
    }
}
