//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub issue comments:
//! - `GET    /repos/{owner}/{repo}/issues/{number}/comments` (paginated)
//! - `POST   /repos/{owner}/{repo}/issues/{number}/comments`
//! - `PATCH  /repos/{owner}/{repo}/issues/comments/{id}`
//! - `DELETE /repos/{owner}/{repo}/issues/comments/{id}`
//! - `POST   /repos/{owner}/{repo}/issues/comments/{id}/reactions`
//!
//! Pull requests share the issue comment endpoints, so the issue number
//! may be either an issue or a PR.
//!
//! # Rate Limiting
//!
//! Returns `ForgeError::RateLimited` when limits are hit. Retrying is
//! the caller's responsibility; this crate does not retry.
//!
//! # Example
//!
//! ```ignore
//! use pr_commenter::forge::github::GitHubForge;
//! use pr_commenter::forge::{Forge, RepoRef};
//!
//! let forge = GitHubForge::new("ghp_xxx");
//! let repo = RepoRef::new("octocat", "hello-world");
//! let page = forge.list_comments(&repo, 42, 1).await?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{Comment, Forge, ForgeError, Reaction, RepoRef};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "pr-commenter";

/// Comments requested per page (GitHub's maximum).
const PER_PAGE: u32 = 100;

/// GitHub forge implementation.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token or `GITHUB_TOKEN`
    token: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &!self.token.is_empty())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge against `api.github.com`.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (e.g., `https://github.example.com/api/v3`).
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        if self.token.is_empty() {
            return Err(ForgeError::AuthRequired);
        }
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| ForgeError::AuthFailed("token is not a valid header value".into()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, repo: &RepoRef, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, repo.owner, repo.repo, path
        )
    }

    /// Attach headers and send.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ForgeError> {
        request
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ForgeError::MalformedResponse(format!("Failed to parse response: {}", e)))
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle a response whose body is irrelevant on success.
    async fn handle_empty_response(&self, response: Response) -> Result<(), ForgeError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ForgeError> {
        // GitHub Apps use X-Accepted-GitHub-Permissions to name what was missing.
        let required_permissions = response
            .headers()
            .get("X-Accepted-GitHub-Permissions")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => {
                let mut err_msg = format!("Permission denied: {}", message);
                if let Some(perms) = required_permissions.filter(|p| !p.is_empty()) {
                    err_msg.push_str(&format!(" [required: {}]", perms));
                }
                ForgeError::AuthFailed(err_msg)
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Fetch a single comment.
    async fn get_comment(&self, repo: &RepoRef, comment_id: u64) -> Result<Comment, ForgeError> {
        let url = self.repo_url(repo, &format!("issues/comments/{}", comment_id));
        let response = self.send(self.client.get(&url)).await?;
        let comment: GitHubComment = self.handle_response(response).await?;
        comment.try_into()
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_comments(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        page: u32,
    ) -> Result<Vec<Comment>, ForgeError> {
        let url = self.repo_url(repo, &format!("issues/{}/comments", issue_number));

        let response = self
            .send(
                self.client
                    .get(&url)
                    .query(&[("per_page", PER_PAGE), ("page", page)]),
            )
            .await?;

        let comments: Vec<GitHubComment> = self.handle_response(response).await?;
        comments.into_iter().map(Comment::try_from).collect()
    }

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> Result<Comment, ForgeError> {
        let url = self.repo_url(repo, &format!("issues/{}/comments", issue_number));

        let response = self
            .send(self.client.post(&url).json(&CommentBody { body }))
            .await?;

        let comment: GitHubComment = self.handle_response(response).await?;
        comment.try_into()
    }

    async fn update_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> Result<Comment, ForgeError> {
        let url = self.repo_url(repo, &format!("issues/comments/{}", comment_id));

        let response = self
            .send(self.client.patch(&url).json(&CommentBody { body }))
            .await?;

        let comment: GitHubComment = self.handle_response(response).await?;
        comment.try_into()
    }

    async fn delete_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
    ) -> Result<Comment, ForgeError> {
        // DELETE answers 204 No Content, so the snapshot is taken first.
        let snapshot = self.get_comment(repo, comment_id).await?;

        let url = self.repo_url(repo, &format!("issues/comments/{}", comment_id));
        let response = self.send(self.client.delete(&url)).await?;
        self.handle_empty_response(response).await?;

        Ok(snapshot)
    }

    async fn add_reaction(
        &self,
        repo: &RepoRef,
        comment_id: u64,
        reaction: Reaction,
    ) -> Result<(), ForgeError> {
        let url = self.repo_url(repo, &format!("issues/comments/{}/reactions", comment_id));

        let response = self
            .send(self.client.post(&url).json(&ReactionBody {
                content: reaction.as_str(),
            }))
            .await?;

        // 200 when the reaction already existed, 201 when created.
        self.handle_empty_response(response).await
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating or editing a comment.
#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Request body for adding a reaction.
#[derive(Serialize)]
struct ReactionBody<'a> {
    content: &'a str,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub issue comment response format.
///
/// Identity fields are optional here so that a response missing them is
/// reported as malformed rather than as a generic decode failure.
#[derive(Debug, Deserialize)]
struct GitHubComment {
    id: Option<u64>,
    body: Option<String>,
    html_url: Option<String>,
}

impl TryFrom<GitHubComment> for Comment {
    type Error = ForgeError;

    fn try_from(c: GitHubComment) -> Result<Self, Self::Error> {
        match (c.id, c.html_url) {
            (Some(id), Some(url)) => Ok(Comment {
                id,
                body: c.body,
                url,
            }),
            (id, url) => Err(ForgeError::MalformedResponse(format!(
                "invalid comment data: id={:?} html_url={:?}",
                id, url
            ))),
        }
    }
}
