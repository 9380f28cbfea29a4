//! # Logging Setup
//!
//! `RUST_LOG` wins when set; otherwise the configured filter applies.
//!
//! ```text
//! RUST_LOG=debug seed            → everything at debug
//! SALESDESK_LOG=warn seed        → warn and above
//! (neither)                      → info,salesdesk=debug,sqlx=warn
//! ```

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor `SALESDESK_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,salesdesk=debug,sqlx=warn";

/// Initializes the tracing subscriber.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
