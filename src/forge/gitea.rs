//! forge::gitea
//!
//! Gitea forge implementation using the `/api/v1` REST API.
//!
//! # Design
//!
//! Works against Gitea, Forgejo and Codeberg. The server URL is supplied
//! by the caller (Gitea Actions exposes it as `GITHUB_SERVER_URL`), and
//! the API lives under `<server>/api/v1`.
//!
//! Gitea's issue comment listing is not paginated: the whole history is
//! returned for page 1 and every later page is reported empty without a
//! request being made.
//!
//! # Example
//!
//! ```ignore
//! use pr_commenter::forge::gitea::GiteaForge;
//! use pr_commenter::forge::{Forge, RepoRef};
//!
//! let forge = GiteaForge::new("https://codeberg.org", "token");
//! let comments = forge.list_comments(&RepoRef::new("owner", "repo"), 3, 1).await?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{Comment, Forge, ForgeError, Reaction, RepoRef};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "pr-commenter";

/// Gitea forge implementation.
pub struct GiteaForge {
    /// HTTP client for making requests
    client: Client,
    /// Access token
    token: String,
    /// Server URL without the `/api/v1` suffix
    server_url: String,
}

// Custom Debug to avoid exposing token
impl std::fmt::Debug for GiteaForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiteaForge")
            .field("has_token", &!self.token.is_empty())
            .field("server_url", &self.server_url)
            .finish()
    }
}

impl GiteaForge {
    /// Create a new Gitea forge.
    ///
    /// # Arguments
    ///
    /// * `server_url` - Instance URL (e.g., `https://codeberg.org`)
    /// * `token` - Access token
    ///
    /// # Example
    ///
    /// ```
    /// use pr_commenter::forge::gitea::GiteaForge;
    ///
    /// let forge = GiteaForge::new("https://git.example.com/", "token");
    /// assert_eq!(forge.api_base(), "https://git.example.com/api/v1");
    /// ```
    pub fn new(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        let server_url = server_url.into();
        let server_url = server_url
            .trim_end_matches('/')
            .trim_end_matches("/api/v1")
            .to_string();
        Self {
            client: Client::new(),
            token: token.into(),
            server_url,
        }
    }

    /// Get the server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> String {
        format!("{}/api/v1", self.server_url)
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        if self.token.is_empty() {
            return Err(ForgeError::AuthRequired);
        }
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("token {}", self.token))
                .map_err(|_| ForgeError::AuthFailed("token is not a valid header value".into()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, repo: &RepoRef, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base(),
            repo.owner,
            repo.repo,
            path
        )
    }

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
            Err(Self::error_from(response, status).await)
        }
    }

    async fn handle_empty_response(&self, response: Response) -> Result<(), ForgeError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response, status).await)
        }
    }

    /// Map a non-success response to a `ForgeError`.
    ///
    /// Gitea error bodies carry `message`, and sometimes only `errors`.
    async fn error_from(response: Response, status: StatusCode) -> ForgeError {
        let message = match response.json::<GiteaErrorResponse>().await {
            Ok(err) => err
                .message
                .filter(|m| !m.is_empty())
                .or_else(|| err.errors.map(|e| e.join("; ")))
                .unwrap_or_else(|| "Unknown error".to_string()),
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Gitea server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn get_comment(&self, repo: &RepoRef, comment_id: u64) -> Result<Comment, ForgeError> {
        let url = self.repo_url(repo, &format!("issues/comments/{}", comment_id));
        let response = self.send(self.client.get(&url)).await?;
        let comment: GiteaComment = self.handle_response(response).await?;
        comment.try_into()
    }
}

#[async_trait]
impl Forge for GiteaForge {
    fn name(&self) -> &'static str {
        "gitea"
    }

    async fn list_comments(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        page: u32,
    ) -> Result<Vec<Comment>, ForgeError> {
        if page > 1 {
            return Ok(Vec::new());
        }

        let url = self.repo_url(repo, &format!("issues/{}/comments", issue_number));
        let response = self.send(self.client.get(&url)).await?;

        let comments: Vec<GiteaComment> = self.handle_response(response).await?;
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

        let comment: GiteaComment = self.handle_response(response).await?;
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

        let comment: GiteaComment = self.handle_response(response).await?;
        comment.try_into()
    }

    async fn delete_comment(
        &self,
        repo: &RepoRef,
        comment_id: u64,
    ) -> Result<Comment, ForgeError> {
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

        self.handle_empty_response(response).await
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct ReactionBody<'a> {
    content: &'a str,
}

/// Gitea error response format.
#[derive(Deserialize)]
struct GiteaErrorResponse {
    message: Option<String>,
    errors: Option<Vec<String>>,
}

/// Gitea issue comment response format.
#[derive(Debug, Deserialize)]
struct GiteaComment {
    id: Option<u64>,
    body: Option<String>,
    html_url: Option<String>,
}

impl TryFrom<GiteaComment> for Comment {
    type Error = ForgeError;

    fn try_from(c: GiteaComment) -> Result<Self, Self::Error> {
        // Gitea reports id 0 and an empty html_url for half-populated records.
        match (c.id.filter(|id| *id != 0), c.html_url.filter(|u| !u.is_empty())) {
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
