//! forge::traits
//!
//! Forge trait definition for issue comment operations on remote hosting
//! services.
//!
//! # Design
//!
//! The `Forge` trait is async because every operation is a network call.
//! All methods return `Result` and adapters never recover locally: a
//! transport or protocol failure is surfaced to the caller as a
//! [`ForgeError`], and the reconciliation core decides what aborts.
//!
//! Adapters normalize platform responses into [`Comment`] before returning.
//! A response missing the comment's identity fields is rejected with
//! [`ForgeError::MalformedResponse`] so a bad value never reaches the
//! decision logic.
//!
//! # Example
//!
//! ```ignore
//! use pr_commenter::forge::{Forge, ForgeError, RepoRef};
//!
//! async fn post(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     let repo = RepoRef::new("octocat", "hello-world");
//!     let comment = forge.create_comment(&repo, 42, "Build passed").await?;
//!     println!("Created comment {}: {}", comment.id, comment.url);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with GitHub or Gitea.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// The forge answered, but the payload could not be used.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The adapter lacks a setting it cannot default.
    #[error("forge not configured: {0}")]
    NotConfigured(String),
}

/// Repository coordinates (`owner/name`) a comment operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse an `owner/name` slug, as found in `GITHUB_REPOSITORY`.
    ///
    /// # Example
    ///
    /// ```
    /// use pr_commenter::forge::RepoRef;
    ///
    /// let repo = RepoRef::parse("octocat/hello-world").unwrap();
    /// assert_eq!(repo.owner, "octocat");
    /// assert_eq!(repo.repo, "hello-world");
    ///
    /// assert!(RepoRef::parse("no-slash").is_none());
    /// assert!(RepoRef::parse("owner/").is_none());
    /// ```
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, repo) = slug.trim().split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self::new(owner, repo))
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A single issue or pull request comment, as returned by a forge.
///
/// Values are snapshots: every adapter call returns a fresh `Comment`
/// and nothing mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Forge-assigned identifier, unique within the forge instance
    pub id: u64,
    /// Comment text. `None` is distinct from an empty body.
    pub body: Option<String>,
    /// Web URL for viewing the comment
    pub url: String,
}

impl Comment {
    /// Whether the body is present and contains `pattern` literally.
    pub fn contains(&self, pattern: &str) -> bool {
        self.body.as_deref().is_some_and(|b| b.contains(pattern))
    }
}

/// Reaction kinds recognised by both GitHub and Gitea.
///
/// See <https://docs.github.com/en/rest/reactions#reaction-types>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    /// 👍
    PlusOne,
    /// 👎
    MinusOne,
    Laugh,
    Confused,
    Heart,
    Hooray,
    Rocket,
    Eyes,
}

impl Reaction {
    /// Get all recognised reactions.
    pub fn all() -> &'static [Reaction] {
        &[
            Reaction::PlusOne,
            Reaction::MinusOne,
            Reaction::Laugh,
            Reaction::Confused,
            Reaction::Heart,
            Reaction::Hooray,
            Reaction::Rocket,
            Reaction::Eyes,
        ]
    }

    /// The API `content` value for this reaction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::PlusOne => "+1",
            Reaction::MinusOne => "-1",
            Reaction::Laugh => "laugh",
            Reaction::Confused => "confused",
            Reaction::Heart => "heart",
            Reaction::Hooray => "hooray",
            Reaction::Rocket => "rocket",
            Reaction::Eyes => "eyes",
        }
    }

    /// Parse a reaction from its API name.
    ///
    /// Matching is exact: `"Heart"` is not a reaction.
    ///
    /// # Example
    ///
    /// ```
    /// use pr_commenter::forge::Reaction;
    ///
    /// assert_eq!(Reaction::parse("+1"), Some(Reaction::PlusOne));
    /// assert_eq!(Reaction::parse("thumbsup"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Reaction::all().iter().copied().find(|r| r.as_str() == s)
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The Forge trait for issue comment operations.
///
/// Implemented once per platform (GitHub, Gitea) plus an in-memory mock.
/// Callers obtain an instance through [`create_forge`] and never import a
/// concrete adapter.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: reaction calls are issued
/// concurrently against the same instance.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Adapters do not retry.
///
/// [`create_forge`]: super::create_forge
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github", "gitea").
    fn name(&self) -> &'static str;

    /// List one page of comments on an issue.
    ///
    /// Pages are 1-indexed. Once the history is exhausted an empty vector
    /// is returned. A page holding fewer comments than a full page is
    /// still a valid interior page; only emptiness signals the end.
    ///
    /// A platform without pagination returns its whole result for page 1
    /// and an empty vector for every later page.
    async fn list_comments(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        page: u32,
    ) -> Result<Vec<Comment>, ForgeError>;

    /// Create a new comment on an issue.
    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<Comment, ForgeError>;

    /// Replace the body of an existing comment.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the comment doesn't exist
    async fn update_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<Comment, ForgeError>;

    /// Delete a comment.
    ///
    /// # Returns
    ///
    /// The comment as it was immediately before deletion.
    async fn delete_comment(&self, repo: &RepoRef, comment_id: u64)
        -> Result<Comment, ForgeError>;

    /// Add a reaction to a comment.
    async fn add_reaction(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        reaction: Reaction,
    ) -> Result<(), ForgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_ref_display() {
        assert_eq!(
            format!("{}", RepoRef::new("octocat", "hello-world")),
            "octocat/hello-world"
        );
    }

    #[test]
    fn repo_ref_parse() {
        assert_eq!(
            RepoRef::parse("owner/repo"),
            Some(RepoRef::new("owner", "repo"))
        );
        assert_eq!(
            RepoRef::parse(" owner/repo.name "),
            Some(RepoRef::new("owner", "repo.name"))
        );
        assert!(RepoRef::parse("").is_none());
        assert!(RepoRef::parse("/repo").is_none());
        assert!(RepoRef::parse("owner/repo/extra").is_none());
    }

    #[test]
    fn comment_contains_requires_body() {
        let comment = Comment {
            id: 1,
            body: None,
            url: "https://example.com/1".into(),
        };
        assert!(!comment.contains(""));

        let comment = Comment {
            body: Some("hello <!-- x -->".into()),
            ..comment
        };
        assert!(comment.contains("<!-- x -->"));
        assert!(comment.contains(""));
        assert!(!comment.contains("<!-- y -->"));
    }

    #[test]
    fn comment_contains_is_literal() {
        let comment = Comment {
            id: 1,
            body: Some("a.b".into()),
            url: "https://example.com/1".into(),
        };
        assert!(comment.contains("a.b"));
        assert!(!comment.contains("a*b"));
    }

    #[test]
    fn reaction_round_trips_names() {
        for reaction in Reaction::all() {
            assert_eq!(Reaction::parse(reaction.as_str()), Some(*reaction));
            assert_eq!(format!("{}", reaction), reaction.as_str());
        }
    }

    #[test]
    fn reaction_parse_is_exact() {
        assert_eq!(Reaction::parse("Heart"), None);
        assert_eq!(Reaction::parse(" heart"), None);
        assert_eq!(Reaction::parse(""), None);
        assert_eq!(Reaction::parse("-1"), Some(Reaction::MinusOne));
    }

    #[test]
    fn forge_error_display() {
        assert_eq!(
            format!("{}", ForgeError::AuthRequired),
            "authentication required"
        );
        assert_eq!(
            format!("{}", ForgeError::NotFound("comment 7".into())),
            "not found: comment 7"
        );
        assert_eq!(
            format!(
                "{}",
                ForgeError::ApiError {
                    status: 422,
                    message: "Validation failed".into()
                }
            ),
            "API error: 422 - Validation failed"
        );
        assert_eq!(
            format!("{}", ForgeError::MalformedResponse("missing id".into())),
            "malformed response: missing id"
        );
        assert_eq!(
            format!("{}", ForgeError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
        assert_eq!(
            format!("{}", ForgeError::NotConfigured("no server URL".into())),
            "forge not configured: no server URL"
        );
    }
}
