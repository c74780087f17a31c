//! Logging initialisation for the census binary.
//!
//! Progress lines go to stderr through a compact `tracing-subscriber`
//! formatter. `RUST_LOG` takes precedence over the `verbose` flag.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive applied when `RUST_LOG` is unset.
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "boardcensus=debug"
    } else {
        "boardcensus=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(verbose: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(stderr_layer)
        .try_init();

    if installed.is_err() {
        tracing::debug!("logging already initialised; keeping existing subscriber");
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{default_directive, init};

    #[rstest]
    #[case::quiet(false, "boardcensus=info")]
    #[case::verbose(true, "boardcensus=debug")]
    fn picks_directive_from_verbosity(#[case] verbose: bool, #[case] expected: &str) {
        assert_eq!(default_directive(verbose), expected);
    }

    #[rstest]
    fn repeated_initialisation_is_harmless() {
        init(false);
        init(true);
        tracing::info!("still logging");
    }
}
