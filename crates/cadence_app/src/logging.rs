//! Log output
//!
//! Every Cadence crate logs through `tracing`. Hosts that already install a
//! subscriber can skip this module entirely.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "cadence=info";

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Safe to call more than once; returns `false` if a global subscriber was
/// already set.
pub fn init() -> bool {
    init_with_filter(DEFAULT_FILTER)
}

/// Like [`init`], with a caller-chosen fallback directive
pub fn init_with_filter(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        // The first call may lose to another test's subscriber; the second
        // must never panic and always reports the slot as taken.
        let _ = init();
        assert!(!init());
    }
}
