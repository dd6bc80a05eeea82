//! ui::output
//!
//! Log setup and failure reporting.
//!
//! # Design
//!
//! Progress goes through `tracing` to stderr, filtered by verbosity unless
//! `RUST_LOG` is set. A failed run prints one message; inside a workflow
//! runner it is also emitted as an `::error::` workflow command so it
//! shows up as an annotation.

use std::fmt::Display;
use tracing_subscriber::EnvFilter;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - warnings and errors only
    Quiet,
    /// Normal mode - decisions and results
    Normal,
    /// Debug mode - per-page search detail
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Default log filter directive for this level.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "pr_commenter=warn,pr_comment=warn",
            Verbosity::Normal => "pr_commenter=info,pr_comment=info",
            Verbosity::Debug => "pr_commenter=debug,pr_comment=debug",
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the verbosity-derived filter. Calling this twice
/// is harmless; the second subscriber is not installed.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(verbosity.filter_directive()),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Whether the process runs inside a GitHub or Gitea workflow runner.
pub fn in_workflow_runner() -> bool {
    std::env::var_os("GITHUB_ACTIONS").is_some() || std::env::var_os("GITEA_ACTIONS").is_some()
}

/// Format a message as a workflow `error` command.
///
/// Newlines and `%` are escaped so multi-line messages stay one command.
pub fn workflow_error(message: impl Display) -> String {
    let escaped = message
        .to_string()
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{}", escaped)
}

/// Report the run's failure (always shown).
pub fn report_failure(message: impl Display) {
    eprintln!("error: {}", message);
    if in_workflow_runner() {
        println!("{}", workflow_error(&message));
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}
