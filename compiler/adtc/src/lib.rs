//! The `adtc` driver: snapshot files in, Rust modules and diagnostics out.
//!
//! A run reads a JSON [snapshot](snapshot) of annotated declarations, feeds
//! each declaration through the [`Pipeline`] (model building, derivations,
//! type-class instances, rendering) and reports the collected messages with
//! the configured emitter.

pub mod commands;
mod config;
mod error;
mod pipeline;
mod report;
pub mod snapshot;

use std::sync::Once;

pub use config::{DriverConfig, OutputFormat};
pub use error::{DriverError, DriverResult};
pub use pipeline::{DeclarationOutput, GeneratedModule, Pipeline, RunOutput};
pub use report::{report, ReportSummary};
pub use snapshot::{load_snapshot, parse_type, read_snapshot};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=adtc=debug`; set
/// `ADTC_LOG_TREE` as well for indented span trees.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var("ADTC_LOG_TREE").is_ok() {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_indent_lines(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
