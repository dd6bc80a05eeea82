//! comment::search
//!
//! Pagination-aware search over an issue's comment history.
//!
//! # Pagination
//!
//! A comment listing has no total count upfront. Pages are fetched one at
//! a time starting at 1, and only an empty page ends the history: a short
//! page is a valid interior page. Page N+1 is never requested before page
//! N's result has been observed.
//!
//! Without a ceiling, an adapter that never returns an empty page makes
//! the search loop forever. Callers that need a hard termination
//! guarantee set `max_pages`.

use tracing::debug;

use super::CommentError;
use crate::forge::{Comment, Forge, RepoRef};

/// Lazy producer of comment pages for one issue.
///
/// Each call to [`next_page`](CommentPages::next_page) performs at most one
/// forge request. The pager can be rewound with
/// [`restart`](CommentPages::restart).
pub struct CommentPages<'a> {
    forge: &'a dyn Forge,
    repo: &'a RepoRef,
    issue_number: u64,
    next: u32,
    fetched: u32,
    exhausted: bool,
    max_pages: Option<u32>,
}

impl<'a> CommentPages<'a> {
    pub fn new(forge: &'a dyn Forge, repo: &'a RepoRef, issue_number: u64) -> Self {
        Self {
            forge,
            repo,
            issue_number,
            next: 1,
            fetched: 0,
            exhausted: false,
            max_pages: None,
        }
    }

    /// Cap the number of page requests. `None` means unbounded.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Number of page requests made since construction or the last restart.
    pub fn pages_fetched(&self) -> u32 {
        self.fetched
    }

    /// Rewind to page 1.
    pub fn restart(&mut self) {
        self.next = 1;
        self.fetched = 0;
        self.exhausted = false;
    }

    /// Fetch the next non-empty page.
    ///
    /// # Returns
    ///
    /// `Some(page)` while history remains, `None` once an empty page has
    /// been observed. After `None`, further calls return `None` without
    /// contacting the forge.
    ///
    /// # Errors
    ///
    /// - `CommentError::Forge` if the adapter call fails
    /// - `CommentError::PageLimitExceeded` if `max_pages` requests were made
    ///   and none of them returned an empty page
    pub async fn next_page(&mut self) -> Result<Option<Vec<Comment>>, CommentError> {
        if self.exhausted {
            return Ok(None);
        }
        if let Some(max) = self.max_pages {
            if self.fetched >= max {
                return Err(CommentError::PageLimitExceeded { pages: self.fetched });
            }
        }

        let page = self.next;
        let comments = self
            .forge
            .list_comments(self.repo, self.issue_number, page)
            .await?;
        self.fetched += 1;

        debug!(
            page,
            count = comments.len(),
            "fetched comments for {}#{}",
            self.repo,
            self.issue_number
        );

        if comments.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }
        self.next += 1;
        Ok(Some(comments))
    }
}

/// Find the first comment whose body contains `pattern`.
///
/// Matches are literal substrings, and comments without a body never
/// match. The first match in page-arrival order wins; no further pages
/// are fetched once it is found.
pub async fn find_comment(
    forge: &dyn Forge,
    repo: &RepoRef,
    issue_number: u64,
    pattern: &str,
    max_pages: Option<u32>,
) -> Result<Option<Comment>, CommentError> {
    let mut pages = CommentPages::new(forge, repo, issue_number).with_max_pages(max_pages);

    while let Some(page) = pages.next_page().await? {
        if let Some(found) = page.into_iter().find(|c| c.contains(pattern)) {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

/// Find every comment whose body contains `pattern`.
///
/// Walks the whole history and returns matches in page-arrival order.
pub async fn find_comments(
    forge: &dyn Forge,
    repo: &RepoRef,
    issue_number: u64,
    pattern: &str,
    max_pages: Option<u32>,
) -> Result<Vec<Comment>, CommentError> {
    let mut pages = CommentPages::new(forge, repo, issue_number).with_max_pages(max_pages);
    let mut matches = Vec::new();

    while let Some(page) = pages.next_page().await? {
        matches.extend(page.into_iter().filter(|c| c.contains(pattern)));
    }

    Ok(matches)
}
