//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "stargazer=info,planning_engine=info,observing_journal=info,warn";
const VERBOSE_FILTER: &str = "stargazer=debug,planning_engine=debug,observing_journal=debug,info";

/// `RUST_LOG` wins when set; otherwise `--verbose` picks the debug filter
pub fn filter_directives(verbose: bool) -> String {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    std::env::var("RUST_LOG").unwrap_or_else(|_| fallback.to_string())
}

/// Install the global subscriber. Log lines go to stderr so stdout carries
/// only command output.
pub fn init(verbose: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter_directives(verbose)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
