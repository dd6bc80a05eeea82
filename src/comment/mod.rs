//! comment
//!
//! Tagged comment reconciliation.
//!
//! # Architecture
//!
//! Given a target issue, a content payload and an optional tag, decide
//! whether to create, update, delete+recreate or skip, then apply
//! reactions to whichever comment ends up current.
//!
//! - [`marker`] - Tag marker rendering and body composition
//! - [`search`] - Pagination-aware search for marked comments
//! - [`reactions`] - Reaction parsing and concurrent application
//! - [`reconcile`] - The decide-then-act sequence
//!
//! The core holds no state between runs: every reconciliation re-derives
//! the current comment from a fresh search against the forge.

pub mod marker;
pub mod reactions;
pub mod reconcile;
pub mod search;

pub use marker::{compose_body, marker, COMMENT_TAG_ID};
pub use reactions::{add_reactions, parse_reactions, ReactionReport};
pub use reconcile::{decide, reconcile, CommentAction, CommentRequest, ReconcileOutcome};
pub use search::{find_comment, find_comments, CommentPages};

use thiserror::Error;

use crate::forge::ForgeError;

/// Errors from comment reconciliation.
#[derive(Debug, Error)]
pub enum CommentError {
    /// A forge call failed; the remaining steps were not run.
    #[error(transparent)]
    Forge(#[from] ForgeError),

    /// The configured page ceiling was reached before an empty page.
    #[error("comment history not exhausted after {pages} pages")]
    PageLimitExceeded {
        /// Number of pages fetched
        pages: u32,
    },
}
