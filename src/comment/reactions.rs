//! comment::reactions
//!
//! Parsing of the reactions input and best-effort application.
//!
//! The input is a comma-separated list such as `"+1, heart"`. All
//! whitespace is stripped before splitting, unknown names and empty
//! entries are dropped silently, and duplicates collapse to their first
//! occurrence.
//!
//! Every recognised reaction is issued concurrently and the outcome of
//! each is collected independently: one rejected reaction never cancels
//! the others or fails the run.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::forge::{Forge, ForgeError, Reaction, RepoRef};

/// Outcome of applying a reaction list to one comment.
#[derive(Debug, Default)]
pub struct ReactionReport {
    /// Reactions the forge accepted, in input order.
    pub applied: Vec<Reaction>,
    /// Reactions the forge rejected, with the error it returned.
    pub failed: Vec<(Reaction, ForgeError)>,
}

impl ReactionReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.failed.is_empty()
    }
}

/// Parse a raw reactions input into recognised reactions.
///
/// # Example
///
/// ```
/// use pr_commenter::comment::parse_reactions;
/// use pr_commenter::forge::Reaction;
///
/// assert_eq!(
///     parse_reactions("+1, bogus,heart,,+1"),
///     vec![Reaction::PlusOne, Reaction::Heart]
/// );
/// assert!(parse_reactions("").is_empty());
/// ```
pub fn parse_reactions(raw: &str) -> Vec<Reaction> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let mut reactions = Vec::new();
    for name in compact.split(',') {
        match Reaction::parse(name) {
            Some(reaction) if !reactions.contains(&reaction) => reactions.push(reaction),
            Some(_) => {}
            None if name.is_empty() => {}
            None => debug!(name, "ignoring unknown reaction"),
        }
    }
    reactions
}

/// Apply every reaction in `raw` to a comment.
///
/// Never fails: per-reaction errors are logged at `warn` and returned in
/// [`ReactionReport::failed`].
pub async fn add_reactions(
    forge: &dyn Forge,
    repo: &RepoRef,
    comment_id: u64,
    raw: &str,
) -> ReactionReport {
    let reactions = parse_reactions(raw);

    let results = join_all(reactions.into_iter().map(|reaction| async move {
        let result = forge.add_reaction(repo, comment_id, reaction).await;
        (reaction, result)
    }))
    .await;

    let mut report = ReactionReport::default();
    for (reaction, result) in results {
        match result {
            Ok(()) => report.applied.push(reaction),
            Err(e) => {
                warn!(%reaction, comment_id, error = %e, "failed to add reaction");
                report.failed.push((reaction, e));
            }
        }
    }
    report
}
