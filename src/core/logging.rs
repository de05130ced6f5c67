//! Tracing subscriber setup
//!
//! `GEARGUARD_LOG` takes an `EnvFilter` directive and wins over the flags.
//! Logs go to stderr so table and JSON output on stdout stay pipeable.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "GEARGUARD_LOG";

/// Filter used when `GEARGUARD_LOG` is unset
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "gearguard=debug,warn"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true, false), "gearguard=debug,warn");
        assert_eq!(default_directive(false, true), "error");
        assert_eq!(default_directive(false, false), "warn");
        // verbose wins over quiet
        assert_eq!(default_directive(true, true), "gearguard=debug,warn");
    }
}
