//! Shared helpers for `charm` integration tests.
//!
//! - [`recording`]: a command runner and filesystem that log every side
//!   effect in call order, so tests can assert on sequencing.
//! - [`builders`]: validated configs and a mock checkout at `/repo`.

pub mod builders;
pub mod recording;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Route `charm` logs into the test harness output.
///
/// Reads the filter from `CHARM_LOG` (same variable as the binary), falling
/// back to `warn` so passing runs stay quiet. Captured output only shows up
/// for failing tests unless `-- --nocapture` is given.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("CHARM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .init();
    });
}
