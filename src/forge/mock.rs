//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge stores comments in memory, in creation order, and pages
//! them with a configurable page size so pagination behaviour can be
//! exercised with small histories. Every call is recorded, and a single
//! operation can be configured to fail.
//!
//! # Example
//!
//! ```
//! use pr_commenter::forge::mock::MockForge;
//! use pr_commenter::forge::{Forge, RepoRef};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new().with_page_size(2);
//! let repo = RepoRef::new("owner", "repo");
//!
//! forge.seed_comment(7, Some("first"));
//! let created = forge.create_comment(&repo, 7, "second").await.unwrap();
//! assert_eq!(created.id, 2);
//!
//! let page = forge.list_comments(&repo, 7, 1).await.unwrap();
//! assert_eq!(page.len(), 2);
//! assert!(forge.list_comments(&repo, 7, 2).await.unwrap().is_empty());
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{Comment, Forge, ForgeError, Reaction, RepoRef};

/// Default number of comments per page.
const DEFAULT_PAGE_SIZE: usize = 30;

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockForge {
    inner: Arc<Mutex<MockForgeInner>>,
}

#[derive(Debug)]
struct MockForgeInner {
    /// Stored comments in creation order, keyed by issue number.
    comments: Vec<(u64, Comment)>,
    /// Reactions per comment id, without duplicates.
    reactions: HashMap<u64, Vec<Reaction>>,
    /// Next comment id to assign.
    next_id: u64,
    page_size: usize,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail list_comments for the given page.
    ListComments { page: u32, error: ForgeError },
    /// Fail create_comment with the given error.
    CreateComment(ForgeError),
    /// Fail update_comment with the given error.
    UpdateComment(ForgeError),
    /// Fail delete_comment with the given error.
    DeleteComment(ForgeError),
    /// Fail add_reaction for one reaction kind only.
    AddReaction { reaction: Reaction, error: ForgeError },
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListComments { issue_number: u64, page: u32 },
    CreateComment { issue_number: u64, body: String },
    UpdateComment { comment_id: u64, body: String },
    DeleteComment { comment_id: u64 },
    AddReaction { comment_id: u64, reaction: Reaction },
}

impl MockOperation {
    /// Whether this operation changes forge state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, MockOperation::ListComments { .. })
    }
}

impl MockForge {
    /// Create a new empty mock forge.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockForgeInner {
                comments: Vec::new(),
                reactions: HashMap::new(),
                next_id: 1,
                page_size: DEFAULT_PAGE_SIZE,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Set the number of comments returned per page.
    ///
    /// A page size of zero is treated as one.
    pub fn with_page_size(self, page_size: usize) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.page_size = page_size.max(1);
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use pr_commenter::forge::mock::{MockForge, FailOn};
    /// use pr_commenter::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::CreateComment(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Insert a comment directly, without recording an operation.
    pub fn seed_comment(&self, issue_number: u64, body: Option<&str>) -> Comment {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;

        let comment = Comment {
            id,
            body: body.map(str::to_string),
            url: format!(
                "https://forge.example/mock/repo/issues/{}#issuecomment-{}",
                issue_number, id
            ),
        };
        inner.comments.push((issue_number, comment.clone()));
        comment
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Get recorded operations that change forge state.
    pub fn mutations(&self) -> Vec<MockOperation> {
        self.operations()
            .into_iter()
            .filter(MockOperation::is_mutation)
            .collect()
    }

    /// Count recorded `list_comments` calls.
    pub fn page_fetches(&self) -> usize {
        self.operations()
            .iter()
            .filter(|op| matches!(op, MockOperation::ListComments { .. }))
            .count()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// Get all comments on an issue, in creation order (for test verification).
    pub fn comments(&self, issue_number: u64) -> Vec<Comment> {
        let inner = self.inner.lock().unwrap();
        inner
            .comments
            .iter()
            .filter(|(issue, _)| *issue == issue_number)
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Get comments on an issue whose body contains `pattern`.
    pub fn comments_containing(&self, issue_number: u64, pattern: &str) -> Vec<Comment> {
        self.comments(issue_number)
            .into_iter()
            .filter(|c| c.contains(pattern))
            .collect()
    }

    /// Get the reactions stored on a comment.
    pub fn reactions(&self, comment_id: u64) -> Vec<Reaction> {
        let inner = self.inner.lock().unwrap();
        inner
            .reactions
            .get(&comment_id)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Return the configured error if `matches` selects the failure.
    fn check_fail(&self, matches: impl Fn(&FailOn) -> Option<&ForgeError>) -> Result<(), ForgeError> {
        let inner = self.inner.lock().unwrap();
        match inner.fail_on.as_ref().and_then(matches) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_comments(
        &self,
        _repo: &RepoRef,
        issue_number: u64,
        page: u32,
    ) -> Result<Vec<Comment>, ForgeError> {
        self.record(MockOperation::ListComments { issue_number, page });

        self.check_fail(|f| match f {
            FailOn::ListComments { page: p, error } if *p == page => Some(error),
            _ => None,
        })?;

        let inner = self.inner.lock().unwrap();
        let skip = (page.max(1) as usize - 1) * inner.page_size;
        Ok(inner
            .comments
            .iter()
            .filter(|(issue, _)| *issue == issue_number)
            .skip(skip)
            .take(inner.page_size)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<Comment, ForgeError> {
        self.record(MockOperation::CreateComment {
            issue_number,
            body: body.to_string(),
        });

        self.check_fail(|f| match f {
            FailOn::CreateComment(e) => Some(e),
            _ => None,
        })?;

        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;

        let comment = Comment {
            id,
            body: Some(body.to_string()),
            url: format!(
                "https://forge.example/{}/issues/{}#issuecomment-{}",
                repo, issue_number, id
            ),
        };
        inner.comments.push((issue_number, comment.clone()));
        Ok(comment)
    }

    async fn update_comment(
        &self,
        _repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<Comment, ForgeError> {
        self.record(MockOperation::UpdateComment {
            comment_id,
            body: body.to_string(),
        });

        self.check_fail(|f| match f {
            FailOn::UpdateComment(e) => Some(e),
            _ => None,
        })?;

        let mut inner = self.inner.lock().unwrap();
        let (_, comment) = inner
            .comments
            .iter_mut()
            .find(|(_, c)| c.id == comment_id)
            .ok_or_else(|| ForgeError::NotFound(format!("comment {}", comment_id)))?;

        comment.body = Some(body.to_string());
        Ok(comment.clone())
    }

    async fn delete_comment(
        &self,
        _repo: &RepoRef,
        comment_id: u64,
    ) -> Result<Comment, ForgeError> {
        self.record(MockOperation::DeleteComment { comment_id });

        self.check_fail(|f| match f {
            FailOn::DeleteComment(e) => Some(e),
            _ => None,
        })?;

        let mut inner = self.inner.lock().unwrap();
        let index = inner
            .comments
            .iter()
            .position(|(_, c)| c.id == comment_id)
            .ok_or_else(|| ForgeError::NotFound(format!("comment {}", comment_id)))?;

        let (_, removed) = inner.comments.remove(index);
        inner.reactions.remove(&comment_id);
        Ok(removed)
    }

    async fn add_reaction(
        &self,
        _repo: &RepoRef,
        comment_id: u64,
        reaction: Reaction,
    ) -> Result<(), ForgeError> {
        self.record(MockOperation::AddReaction {
            comment_id,
            reaction,
        });

        self.check_fail(|f| match f {
            FailOn::AddReaction { reaction: r, error } if *r == reaction => Some(error),
            _ => None,
        })?;

        let mut inner = self.inner.lock().unwrap();
        if !inner.comments.iter().any(|(_, c)| c.id == comment_id) {
            return Err(ForgeError::NotFound(format!("comment {}", comment_id)));
        }

        // Like the real platforms, re-adding a reaction is a no-op.
        let reactions = inner.reactions.entry(comment_id).or_default();
        if !reactions.contains(&reaction) {
            reactions.push(reaction);
        }
        Ok(())
    }
}
