//! Diagnostic tracing for the server process.
//!
//! stdout carries the MCP protocol, so every event goes to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, which still surfaces
/// a discarded corrupt library file.
///
/// # Example
/// ```bash
/// RUST_LOG=library_mcp=debug library-mcp ~/books.json
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .compact(),
        )
        .init();
}
