//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so stdout stays clean for JSON and CSV output.
//! `HOSTCOLLIDE_LOG` (or `RUST_LOG`) overrides the level chosen by flags.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "HOSTCOLLIDE_LOG";

/// Default filter directive for the given verbosity flags.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "hostcollide=debug"
    } else if quiet {
        "hostcollide=error"
    } else {
        "hostcollide=warn"
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false, false), "hostcollide=warn");
        assert_eq!(default_directive(true, false), "hostcollide=debug");
        assert_eq!(default_directive(false, true), "hostcollide=error");
    }

    #[test]
    fn test_init_twice() {
        init(false, false);
        init(true, false);
    }
}
