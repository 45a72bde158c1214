//! Logging setup for the binary.
//!
//! Events go to stderr so they never mix with the response body. `RUST_LOG`
//! wins when set; otherwise `--verbose` selects `debug`, `--silent` turns
//! logging off and the default is `warn`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool, silent: bool) -> &'static str {
    match (verbose, silent) {
        (true, _) => "debug",
        (false, true) => "off",
        (false, false) => "warn",
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool, silent: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, silent)));
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
    fn verbose_wins_over_silent() {
        assert_eq!(default_directive(true, true), "debug");
        assert_eq!(default_directive(false, true), "off");
        assert_eq!(default_directive(false, false), "warn");
    }
}
