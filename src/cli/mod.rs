//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse arguments and step inputs
//! - Resolve configuration against the runner context
//! - Build the forge and run one reconciliation
//!
//! # Architecture
//!
//! The CLI layer is thin. Decisions live in [`crate::comment`]; the CLI
//! only wires configuration to a forge and reports the result.

pub mod args;

pub use args::Cli;

use anyhow::{Context as _, Result};
use tracing::{debug, info};

use crate::comment::{reconcile, CommentAction, ReconcileOutcome};
use crate::core::config::Config;
use crate::forge::create_forge;
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    output::init_logging(verbosity);

    let config = Config::resolve(cli.inputs(), |key| std::env::var(key).ok())?;
    execute(&config, verbosity).await
}

/// Run one reconciliation for a resolved configuration.
pub async fn execute(config: &Config, verbosity: Verbosity) -> Result<()> {
    debug!(?config, "resolved configuration");

    let forge = create_forge(config.provider, &config.token, config.api_url.as_deref())?;
    let request = config.request();

    let outcome = reconcile(forge.as_ref(), &request)
        .await
        .with_context(|| format!("failed to comment on {}#{}", config.repo, config.issue_number))?;

    if !outcome.reactions.failed.is_empty() {
        info!(
            applied = outcome.reactions.applied.len(),
            failed = outcome.reactions.failed.len(),
            "some reactions were not added"
        );
    }

    if let Some(line) = result_line(&outcome) {
        output::success(line, verbosity);
    }
    Ok(())
}

/// The line printed on success, or `None` when nothing was written.
pub fn result_line(outcome: &ReconcileOutcome) -> Option<String> {
    let verb = match outcome.action {
        CommentAction::Create => "Created",
        CommentAction::Update { .. } => "Updated",
        CommentAction::Recreate { .. } => "Recreated",
        CommentAction::Skip => return None,
    };
    let comment = outcome.comment.as_ref()?;
    Some(format!("{} comment {}", verb, comment.url))
}
