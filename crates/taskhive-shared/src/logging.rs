//! Logging initialization, shared by every binary in the workspace.

use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber. `default_directive` scopes the
/// default level to the calling binary's own crate (e.g. `"taskhive_cli=info"`)
/// so dependency crates stay quiet unless `RUST_LOG` says otherwise.
///
/// When `dev_mode` is set (the original's `RUN_MODE=air`), the default floor
/// is raised to `debug` for the calling crate.
pub fn init(default_directive: &str, dev_mode: bool) -> anyhow::Result<()> {
    let directive = if dev_mode {
        default_directive.replace("=info", "=debug")
    } else {
        default_directive.to_string()
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
