//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for the demo binary and
//! the developer's local runs. Library code only emits `tracing` events and
//! never installs a subscriber, so embedding applications keep full control
//! of their logging configuration.
//!
//! Log levels are filtered through the `RUST_LOG` environment variable:
//!
//! ```bash
//! # Lifecycle + fulfillment outcomes
//! RUST_LOG=info cargo run
//!
//! # Per-order detail, including statistics contributions
//! RUST_LOG=debug cargo run
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
