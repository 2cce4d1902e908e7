//! Emit errctx errors as structured `tracing` events.
//!
//! An [`ErrorLogger`] is handed an [`Extractor`](errctx::bridge::Extractor)
//! and a [`LoggerConfig`]. For each error it emits one event whose message is
//! the error's `msg` pair and whose fields carry the remaining pairs:
//!
//! ```text
//! ERROR errctx_tracing::logger: cannot load document label=errctx \
//!     fields=user_id=u-42 doc_id=doc-7 error.cause="disk on fire" structured=true
//! ```
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=errctx=debug`: report panics recovered while rendering values
//!   and extractor installation.
//! - `RUST_LOG=errctx_tracing=error`: only the error events themselves.
//!
//! Nothing is printed unless a subscriber is installed; [`init_tracing`] installs
//! the default one when `RUST_LOG` is set.

mod config;
mod logger;
mod record;

pub use config::LoggerConfig;
pub use logger::ErrorLogger;
pub use record::Record;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a `fmt` subscriber for error events, filtered by `RUST_LOG`.
///
/// This prints what [`ErrorLogger`] emits and the `errctx` diagnostics
/// (recovered rendering panics, extractor installation). Does nothing when
/// `RUST_LOG` is unset or unparsable, or when the application already set a
/// global subscriber. Later calls are no-ops.
///
/// ```bash
/// RUST_LOG=errctx_tracing=warn,errctx=debug cargo run
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_default_env() else {
            return;
        };
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init();
    });
}
