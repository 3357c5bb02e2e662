//! Log setup. Output goes to stderr.
//!
//! ```text
//! ESPARSE_LOG=debug esparse file.js
//! ESPARSE_LOG="esparse_parser::asi=debug" esparse file.js
//! ```

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (same syntax as `RUST_LOG`).
pub const LOG_ENV: &str = "ESPARSE_LOG";

/// Filter for `-v` repeated `verbose` times. `None` when no flag was given.
fn verbosity_filter(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Builds the filter: `-v` flags win over `ESPARSE_LOG`, which wins over the `warn` default.
pub fn build_filter(verbose: u8, env: Option<&str>) -> EnvFilter {
    match (verbosity_filter(verbose), env) {
        (Some(level), _) => EnvFilter::new(level),
        (None, Some(directives)) => EnvFilter::builder().parse_lossy(directives),
        (None, None) => EnvFilter::new("warn"),
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(verbose: u8) {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(verbose, env.as_deref());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_environment() {
        assert_eq!(build_filter(0, None).to_string(), "warn");
        assert_eq!(build_filter(2, Some("error")).to_string(), "debug");
        assert_eq!(build_filter(9, None).to_string(), "trace");
        assert_eq!(
            build_filter(0, Some("esparse_parser=debug")).to_string(),
            "esparse_parser=debug"
        );
    }
}
