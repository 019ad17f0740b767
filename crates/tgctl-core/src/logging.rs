use tracing_subscriber::{fmt, EnvFilter};

use crate::Result;

/// Initialize logging/tracing for a one-shot command.
///
/// Logs go to stderr so they never interleave with command output on stdout.
/// `verbose` raises our crates to `info`; `RUST_LOG` overrides both.
pub fn init(service_name: &str, verbose: bool) -> Result<()> {
    let ours = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,tgctl_core={ours},tgctl_telegram={ours},{service_name}={ours}"
        ))
    });

    // A second init (tests, embedding) is not an error worth failing over.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    Ok(())
}
