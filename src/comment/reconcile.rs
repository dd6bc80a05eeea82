//! comment::reconcile
//!
//! The decide-then-act sequence for one tagged comment.
//!
//! # Flow
//!
//! 1. Compose the body (content plus marker when tagged).
//! 2. Untagged requests always create; no search is performed.
//! 3. Tagged requests search for the marker, then [`decide`] picks one
//!    [`CommentAction`] before any mutating call is made.
//! 4. The action is executed. Recreate awaits the delete before creating,
//!    so a failed delete leaves the old comment in place and creates
//!    nothing.
//! 5. Reactions are applied to whichever comment is current afterwards.
//!    A skipped run issues no reaction calls.

use tracing::info;

use super::marker::{compose_body, marker};
use super::reactions::{add_reactions, ReactionReport};
use super::search::find_comment;
use super::CommentError;
use crate::forge::{Comment, Forge, RepoRef};

/// Inputs for one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRequest {
    pub repo: RepoRef,
    pub issue_number: u64,
    /// Visible comment content, without marker.
    pub content: String,
    /// Identifies the logical comment across runs. Empty means untagged.
    pub comment_tag: Option<String>,
    /// Raw comma-separated reactions input.
    pub reactions: Option<String>,
    /// Delete and recreate a found comment instead of editing it.
    pub recreate: bool,
    /// Create when a tagged comment is not found.
    pub create_if_not_exists: bool,
    /// Ceiling on comment pages fetched during search.
    pub max_pages: Option<u32>,
}

impl CommentRequest {
    pub fn new(repo: RepoRef, issue_number: u64, content: impl Into<String>) -> Self {
        Self {
            repo,
            issue_number,
            content: content.into(),
            comment_tag: None,
            reactions: None,
            recreate: false,
            create_if_not_exists: true,
            max_pages: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.comment_tag = Some(tag.into());
        self
    }

    pub fn with_reactions(mut self, reactions: impl Into<String>) -> Self {
        self.reactions = Some(reactions.into());
        self
    }

    pub fn recreate(mut self, recreate: bool) -> Self {
        self.recreate = recreate;
        self
    }

    pub fn create_if_not_exists(mut self, create: bool) -> Self {
        self.create_if_not_exists = create;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// The effective tag; an empty tag counts as none.
    pub fn tag(&self) -> Option<&str> {
        self.comment_tag.as_deref().filter(|t| !t.is_empty())
    }

    /// The full comment body to write.
    pub fn body(&self) -> String {
        compose_body(&self.content, self.tag())
    }

    fn target(&self) -> String {
        format!("{}#{}", self.repo, self.issue_number)
    }
}

/// What a reconciliation will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    /// Post a new comment.
    Create,
    /// Edit the found comment in place.
    Update { comment_id: u64 },
    /// Delete the found comment, then post a new one.
    Recreate { comment_id: u64 },
    /// Touch nothing.
    Skip,
}

/// Pick the action for a search result.
///
/// `tagged` is false for untagged requests, which never search and
/// always create.
///
/// # Example
///
/// ```
/// use pr_commenter::comment::{decide, CommentAction};
///
/// assert_eq!(decide(None, false, false, false), CommentAction::Create);
/// assert_eq!(decide(None, true, false, false), CommentAction::Skip);
/// ```
pub fn decide(
    existing: Option<&Comment>,
    tagged: bool,
    recreate: bool,
    create_if_not_exists: bool,
) -> CommentAction {
    if !tagged {
        return CommentAction::Create;
    }
    match existing {
        Some(c) if recreate => CommentAction::Recreate { comment_id: c.id },
        Some(c) => CommentAction::Update { comment_id: c.id },
        None if create_if_not_exists => CommentAction::Create,
        None => CommentAction::Skip,
    }
}

/// Result of a completed reconciliation.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub action: CommentAction,
    /// The comment that is current after the run; `None` when skipped.
    pub comment: Option<Comment>,
    pub reactions: ReactionReport,
}

/// Run one reconciliation against a forge.
///
/// # Errors
///
/// Any search, create, update or delete failure aborts the remaining
/// steps and is returned. Reaction failures are reported in
/// [`ReconcileOutcome::reactions`] and never returned as errors.
pub async fn reconcile(
    forge: &dyn Forge,
    request: &CommentRequest,
) -> Result<ReconcileOutcome, CommentError> {
    let repo = &request.repo;
    let issue = request.issue_number;
    let body = request.body();

    let existing = match request.tag() {
        Some(tag) => find_comment(forge, repo, issue, &marker(tag), request.max_pages).await?,
        None => None,
    };

    let action = decide(
        existing.as_ref(),
        request.tag().is_some(),
        request.recreate,
        request.create_if_not_exists,
    );

    let comment = match action {
        CommentAction::Recreate { comment_id } => {
            info!("Recreating comment for {}", request.target());
            forge.delete_comment(repo, comment_id).await?;
            Some(forge.create_comment(repo, issue, &body).await?)
        }
        CommentAction::Update { comment_id } => {
            info!("Updating comment for {}", request.target());
            Some(forge.update_comment(repo, comment_id, &body).await?)
        }
        CommentAction::Create => {
            if request.tag().is_some() {
                info!("No comment has been found with asked pattern.");
            }
            info!("Creating a new comment for {}", request.target());
            Some(forge.create_comment(repo, issue, &body).await?)
        }
        CommentAction::Skip => {
            info!("No comment has been found with asked pattern.");
            info!(
                "Not creating comment as the pattern has not been found. \
                 Use `create_if_not_exists: true` to create a new comment anyway."
            );
            None
        }
    };

    let reactions = match (&comment, request.reactions.as_deref()) {
        (Some(c), Some(raw)) => add_reactions(forge, repo, c.id, raw).await,
        _ => ReactionReport::default(),
    };

    Ok(ReconcileOutcome {
        action,
        comment,
        reactions,
    })
}
