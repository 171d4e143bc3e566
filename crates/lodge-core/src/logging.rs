//! Logging initialization
//!
//! One-shot setup for the tracing subscriber. The console owns stdout as
//! its user-facing protocol, so logs always go to stderr.

use std::io;
use std::sync::Once;

use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// No-op subscriber for tests
    Test,
}

impl Profile {
    /// Filter applied when `RUST_LOG` is not set
    ///
    /// Directives are per-crate: an `EnvFilter` matches whole path
    /// segments, so the workspace members are named individually.
    fn default_directives(self) -> &'static str {
        match self {
            Profile::Development => "lodge_core=debug,lodge_store=debug,lodge_cli=debug",
            Profile::Production => "lodge_core=info,lodge_store=info,lodge_cli=info",
            Profile::Test => "off",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directives()))
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Called once at startup; repeated calls are no-ops. Both output profiles
/// write to stderr so that log lines never interleave with the console's
/// stdout output.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(io::stderr)
                .with_env_filter(profile.filter())
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(io::stderr)
                .with_env_filter(profile.filter())
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}
