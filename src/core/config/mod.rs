//! core::config
//!
//! Invocation parameters and their resolution.
//!
//! # Overview
//!
//! A run is configured from two places:
//! - **Inputs**: explicit values from command-line flags or, when running
//!   as a workflow step, the `INPUT_*` variables the runner sets for each
//!   step input (merged by the CLI layer)
//! - **Context**: ambient variables the runner provides
//!   (`GITHUB_REPOSITORY`, `GITHUB_EVENT_PATH`, `GITEA_ACTIONS`, ...)
//!
//! Empty strings count as absent everywhere: runners set every declared
//! input, including the ones the workflow left blank.
//!
//! # Precedence
//!
//! For values with both sources, the explicit input wins:
//! 1. Explicit input
//! 2. Ambient context variable
//! 3. Default
//!
//! # Example
//!
//! ```no_run
//! use pr_commenter::core::config::{Config, Inputs};
//!
//! let inputs = Inputs {
//!     message: Some("Build passed".into()),
//!     comment_tag: Some("build-status".into()),
//!     ..Inputs::default()
//! };
//! let config = Config::resolve(inputs, |key| std::env::var(key).ok()).unwrap();
//! println!("Commenting on {}#{}", config.repo, config.issue_number);
//! ```

pub mod event;

pub use event::EventPayload;

use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::comment::CommentRequest;
use crate::forge::{available_providers_string, ForgeProvider, RepoRef};

/// Errors from configuration resolution.
///
/// All of these are reported before any forge call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Either \"filePath\" or \"message\" should be provided as input")]
    MissingContent,

    #[error("Only one of \"filePath\" or \"message\" may be provided as input")]
    ConflictingContent,

    #[error("failed to read '{path}': {source}")]
    ReadContent {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No issue/pull request in input neither in current context.")]
    MissingIssueNumber,

    #[error("failed to read event payload '{path}': {message}")]
    EventPayload { path: PathBuf, message: String },

    #[error("no token provided (set the GITHUB_TOKEN input or pass --token)")]
    MissingToken,

    #[error("invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),

    #[error("unknown forge provider '{name}'. Available providers: {available}")]
    UnknownForge { name: String, available: String },

    #[error("Gitea server URL not configured. Set GITHUB_SERVER_URL or pass --api-url.")]
    MissingServerUrl,
}

/// Explicit inputs, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub message: Option<String>,
    pub file_path: Option<PathBuf>,
    /// Raw pull request number; non-numeric values fall back to context.
    pub pr_number: Option<String>,
    pub comment_tag: Option<String>,
    pub reactions: Option<String>,
    pub recreate: bool,
    pub create_if_not_exists: bool,
    pub token: Option<String>,
    /// `owner/name`
    pub repo: Option<String>,
    /// Forge override: `github` or `gitea`.
    pub forge: Option<String>,
    pub api_url: Option<String>,
    pub max_pages: Option<u32>,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            message: None,
            file_path: None,
            pr_number: None,
            comment_tag: None,
            reactions: None,
            recreate: false,
            create_if_not_exists: true,
            token: None,
            repo: None,
            forge: None,
            api_url: None,
            max_pages: None,
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub provider: ForgeProvider,
    /// API base (GitHub) or server URL (Gitea); `None` uses the adapter default.
    pub api_url: Option<String>,
    pub token: String,
    pub repo: RepoRef,
    pub issue_number: u64,
    pub content: String,
    pub comment_tag: Option<String>,
    pub reactions: Option<String>,
    pub recreate: bool,
    pub create_if_not_exists: bool,
    pub max_pages: Option<u32>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("token", &"[redacted]")
            .field("repo", &self.repo)
            .field("issue_number", &self.issue_number)
            .field("comment_tag", &self.comment_tag)
            .field("reactions", &self.reactions)
            .field("recreate", &self.recreate)
            .field("create_if_not_exists", &self.create_if_not_exists)
            .field("max_pages", &self.max_pages)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Resolve inputs against the ambient context.
    ///
    /// `env` looks up context variables; pass `|k| std::env::var(k).ok()`
    /// in production.
    ///
    /// # Errors
    ///
    /// Content is checked first, then the issue number, then the
    /// forge-facing values.
    pub fn resolve<F>(inputs: Inputs, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| non_empty(env(key));

        let content = resolve_content(non_empty(inputs.message), inputs.file_path)?;
        let issue_number = resolve_issue_number(
            non_empty(inputs.pr_number).as_deref(),
            env("GITHUB_EVENT_PATH").map(PathBuf::from),
        )?;

        let token = non_empty(inputs.token)
            .or_else(|| env("GITHUB_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;

        let slug = non_empty(inputs.repo)
            .or_else(|| env("GITHUB_REPOSITORY"))
            .unwrap_or_default();
        let repo = RepoRef::parse(&slug).ok_or(ConfigError::InvalidRepository(slug))?;

        let provider = match non_empty(inputs.forge) {
            Some(name) => ForgeProvider::parse(&name).ok_or_else(|| ConfigError::UnknownForge {
                name,
                available: available_providers_string(),
            })?,
            None => ForgeProvider::detect(env("GITEA_ACTIONS").is_some_and(|v| is_truthy(&v))),
        };

        let api_url = non_empty(inputs.api_url).or_else(|| match provider {
            ForgeProvider::GitHub => env("GITHUB_API_URL"),
            ForgeProvider::Gitea => env("GITHUB_SERVER_URL"),
        });
        if provider == ForgeProvider::Gitea && api_url.is_none() {
            return Err(ConfigError::MissingServerUrl);
        }

        Ok(Config {
            provider,
            api_url,
            token,
            repo,
            issue_number,
            content,
            comment_tag: non_empty(inputs.comment_tag),
            reactions: non_empty(inputs.reactions),
            recreate: inputs.recreate,
            create_if_not_exists: inputs.create_if_not_exists,
            max_pages: inputs.max_pages,
        })
    }

    /// The reconciliation request this configuration describes.
    pub fn request(&self) -> CommentRequest {
        CommentRequest {
            repo: self.repo.clone(),
            issue_number: self.issue_number,
            content: self.content.clone(),
            comment_tag: self.comment_tag.clone(),
            reactions: self.reactions.clone(),
            recreate: self.recreate,
            create_if_not_exists: self.create_if_not_exists,
            max_pages: self.max_pages,
        }
    }
}

fn resolve_content(
    message: Option<String>,
    file_path: Option<PathBuf>,
) -> Result<String, ConfigError> {
    let file_path = file_path.filter(|p| !p.as_os_str().is_empty());
    match (message, file_path) {
        (Some(_), Some(_)) => Err(ConfigError::ConflictingContent),
        (Some(message), None) => Ok(message),
        (None, Some(path)) => {
            fs::read_to_string(&path).map_err(|source| ConfigError::ReadContent { path, source })
        }
        (None, None) => Err(ConfigError::MissingContent),
    }
}

fn resolve_issue_number(
    pr_number: Option<&str>,
    event_path: Option<PathBuf>,
) -> Result<u64, ConfigError> {
    if let Some(n) = pr_number.and_then(parse_issue_number) {
        return Ok(n);
    }
    match event_path {
        Some(path) => EventPayload::load(&path)?
            .issue_number()
            .ok_or(ConfigError::MissingIssueNumber),
        None => Err(ConfigError::MissingIssueNumber),
    }
}

/// Parse a positive issue number. Zero and non-numeric values are absent.
fn parse_issue_number(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn is_truthy(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "" | "0" | "false" | "no" | "off")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn context(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn base_context<'a>() -> Vec<(&'a str, &'a str)> {
        vec![("GITHUB_TOKEN", "t0ken"), ("GITHUB_REPOSITORY", "owner/repo")]
    }

    fn inputs(message: &str, pr: &str) -> Inputs {
        Inputs {
            message: Some(message.into()),
            pr_number: Some(pr.into()),
            ..Inputs::default()
        }
    }

    fn event_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    mod content {
        use super::*;

        #[test]
        fn missing_content() {
            let err = Config::resolve(
                Inputs {
                    message: Some(String::new()),
                    pr_number: Some("3".into()),
                    ..Inputs::default()
                },
                context(&base_context()),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::MissingContent));
            assert_eq!(
                err.to_string(),
                "Either \"filePath\" or \"message\" should be provided as input"
            );
        }

        #[test]
        fn conflicting_content() {
            let err = Config::resolve(
                Inputs {
                    file_path: Some("body.md".into()),
                    ..inputs("hi", "3")
                },
                context(&base_context()),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::ConflictingContent));
        }

        #[test]
        fn reads_file_content() {
            let file = event_file("from file\n");
            let config = Config::resolve(
                Inputs {
                    file_path: Some(file.path().to_path_buf()),
                    pr_number: Some("3".into()),
                    ..Inputs::default()
                },
                context(&base_context()),
            )
            .unwrap();
            assert_eq!(config.content, "from file\n");
        }

        #[test]
        fn unreadable_file() {
            let err = Config::resolve(
                Inputs {
                    file_path: Some("/definitely/not/here.md".into()),
                    pr_number: Some("3".into()),
                    ..Inputs::default()
                },
                context(&base_context()),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::ReadContent { .. }));
        }
    }

    mod issue_number {
        use super::*;

        #[test]
        fn explicit_number_wins() {
            let config = Config::resolve(inputs("hi", "42"), context(&base_context())).unwrap();
            assert_eq!(config.issue_number, 42);
        }

        #[test]
        fn falls_back_to_pull_request_then_issue() {
            let pr = event_file(r#"{"pull_request":{"number":7},"issue":{"number":9}}"#);
            let path = pr.path().to_string_lossy().to_string();
            let mut vars = base_context();
            vars.push(("GITHUB_EVENT_PATH", &path));

            let config = Config::resolve(inputs("hi", "abc"), context(&vars)).unwrap();
            assert_eq!(config.issue_number, 7);

            let issue = event_file(r#"{"issue":{"number":9}}"#);
            let path = issue.path().to_string_lossy().to_string();
            let mut vars = base_context();
            vars.push(("GITHUB_EVENT_PATH", &path));

            let config = Config::resolve(inputs("hi", "0"), context(&vars)).unwrap();
            assert_eq!(config.issue_number, 9);
        }

        #[test]
        fn missing_everywhere() {
            let push = event_file(r#"{"ref":"refs/heads/main"}"#);
            let path = push.path().to_string_lossy().to_string();
            let mut vars = base_context();
            vars.push(("GITHUB_EVENT_PATH", &path));

            let err = Config::resolve(inputs("hi", ""), context(&vars)).unwrap_err();
            assert_eq!(
                err.to_string(),
                "No issue/pull request in input neither in current context."
            );

            let err = Config::resolve(inputs("hi", ""), context(&base_context())).unwrap_err();
            assert!(matches!(err, ConfigError::MissingIssueNumber));
        }

        #[test]
        fn parse_rules() {
            assert_eq!(parse_issue_number("12"), Some(12));
            assert_eq!(parse_issue_number(" 12 "), Some(12));
            assert_eq!(parse_issue_number("0"), None);
            assert_eq!(parse_issue_number("-3"), None);
            assert_eq!(parse_issue_number("#12"), None);
        }
    }

    mod context_values {
        use super::*;

        #[test]
        fn content_checked_before_token() {
            let err = Config::resolve(Inputs::default(), context(&[])).unwrap_err();
            assert!(matches!(err, ConfigError::MissingContent));
        }

        #[test]
        fn missing_token() {
            let err = Config::resolve(
                inputs("hi", "1"),
                context(&[("GITHUB_REPOSITORY", "owner/repo")]),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::MissingToken));
        }

        #[test]
        fn explicit_token_wins() {
            let config = Config::resolve(
                Inputs {
                    token: Some("explicit".into()),
                    ..inputs("hi", "1")
                },
                context(&base_context()),
            )
            .unwrap();
            assert_eq!(config.token, "explicit");
        }

        #[test]
        fn invalid_repository() {
            let err = Config::resolve(
                inputs("hi", "1"),
                context(&[("GITHUB_TOKEN", "t"), ("GITHUB_REPOSITORY", "no-slash")]),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRepository(ref s) if s == "no-slash"));
        }

        #[test]
        fn github_by_default() {
            let mut vars = base_context();
            vars.push(("GITHUB_API_URL", "https://ghe.example/api/v3"));
            vars.push(("GITHUB_SERVER_URL", "https://ghe.example"));

            let config = Config::resolve(inputs("hi", "1"), context(&vars)).unwrap();
            assert_eq!(config.provider, ForgeProvider::GitHub);
            assert_eq!(config.api_url.as_deref(), Some("https://ghe.example/api/v3"));
        }

        #[test]
        fn gitea_actions_selects_gitea() {
            let mut vars = base_context();
            vars.push(("GITEA_ACTIONS", "true"));
            vars.push(("GITHUB_SERVER_URL", "https://gitea.example"));

            let config = Config::resolve(inputs("hi", "1"), context(&vars)).unwrap();
            assert_eq!(config.provider, ForgeProvider::Gitea);
            assert_eq!(config.api_url.as_deref(), Some("https://gitea.example"));
        }

        #[test]
        fn falsy_gitea_flag_is_ignored() {
            let mut vars = base_context();
            vars.push(("GITEA_ACTIONS", "false"));

            let config = Config::resolve(inputs("hi", "1"), context(&vars)).unwrap();
            assert_eq!(config.provider, ForgeProvider::GitHub);
        }

        #[test]
        fn forge_override() {
            let config = Config::resolve(
                Inputs {
                    forge: Some("gitea".into()),
                    api_url: Some("https://codeberg.org".into()),
                    ..inputs("hi", "1")
                },
                context(&base_context()),
            )
            .unwrap();
            assert_eq!(config.provider, ForgeProvider::Gitea);

            let err = Config::resolve(
                Inputs {
                    forge: Some("gitlab".into()),
                    ..inputs("hi", "1")
                },
                context(&base_context()),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::UnknownForge { ref name, .. } if name == "gitlab"));
            assert_eq!(
                err.to_string(),
                "unknown forge provider 'gitlab'. Available providers: github, gitea"
            );
        }

        #[test]
        fn gitea_needs_a_server_url() {
            let mut vars = base_context();
            vars.push(("GITEA_ACTIONS", "true"));

            let err = Config::resolve(inputs("hi", "1"), context(&vars)).unwrap_err();
            assert!(matches!(err, ConfigError::MissingServerUrl));
            assert!(err.to_string().contains("GITHUB_SERVER_URL"));

            let err = Config::resolve(
                Inputs {
                    forge: Some("forgejo".into()),
                    ..inputs("hi", "1")
                },
                context(&base_context()),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::MissingServerUrl));
        }

        #[test]
        fn empty_optional_inputs_are_absent() {
            let config = Config::resolve(
                Inputs {
                    comment_tag: Some(String::new()),
                    reactions: Some(String::new()),
                    ..inputs("hi", "1")
                },
                context(&base_context()),
            )
            .unwrap();
            assert_eq!(config.comment_tag, None);
            assert_eq!(config.reactions, None);
        }

        #[test]
        fn debug_redacts_token() {
            let config = Config::resolve(inputs("hi", "1"), context(&base_context())).unwrap();
            let debug = format!("{:?}", config);
            assert!(!debug.contains("t0ken"));
            assert!(debug.contains("[redacted]"));
        }
    }

    #[test]
    fn request_carries_flags() {
        let config = Config::resolve(
            Inputs {
                comment_tag: Some("t".into()),
                recreate: true,
                create_if_not_exists: false,
                max_pages: Some(4),
                ..inputs("hi", "5")
            },
            context(&base_context()),
        )
        .unwrap();

        let request = config.request();
        assert_eq!(request.issue_number, 5);
        assert_eq!(request.tag(), Some("t"));
        assert!(request.recreate);
        assert!(!request.create_if_not_exists);
        assert_eq!(request.max_pages, Some(4));
    }
}
