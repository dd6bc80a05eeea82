//! forge::factory
//!
//! Forge selection and creation.
//!
//! # Design
//!
//! This module is the single place that knows about concrete adapters.
//! The orchestrator calls [`create_forge`] and works with the returned
//! `Box<dyn Forge>`, so the reconciliation core never depends on a
//! specific platform.
//!
//! # Provider Selection
//!
//! - An explicit override (`--forge gitea`) wins.
//! - Otherwise the runtime flag decides: running under Gitea Actions
//!   (`GITEA_ACTIONS` truthy) selects Gitea, anything else selects GitHub.
//!
//! # Example
//!
//! ```ignore
//! use pr_commenter::forge::{create_forge, ForgeProvider};
//!
//! let provider = ForgeProvider::detect(std::env::var_os("GITEA_ACTIONS").is_some());
//! let forge = create_forge(provider, "token", None)?;
//! ```

use super::gitea::GiteaForge;
use super::github::GitHubForge;
use super::traits::{Forge, ForgeError};

/// Supported forge providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForgeProvider {
    /// GitHub (default)
    #[default]
    GitHub,
    /// Gitea, Forgejo, Codeberg
    Gitea,
}

impl ForgeProvider {
    /// Get all available providers.
    ///
    /// # Example
    ///
    /// ```
    /// use pr_commenter::forge::ForgeProvider;
    ///
    /// let providers = ForgeProvider::all();
    /// assert!(providers.contains(&ForgeProvider::GitHub));
    /// assert!(providers.contains(&ForgeProvider::Gitea));
    /// ```
    pub fn all() -> &'static [ForgeProvider] {
        &[ForgeProvider::GitHub, ForgeProvider::Gitea]
    }

    /// Get the provider name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeProvider::GitHub => "github",
            ForgeProvider::Gitea => "gitea",
        }
    }

    /// Parse a provider from a string (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use pr_commenter::forge::ForgeProvider;
    ///
    /// assert_eq!(ForgeProvider::parse("GitHub"), Some(ForgeProvider::GitHub));
    /// assert_eq!(ForgeProvider::parse("forgejo"), Some(ForgeProvider::Gitea));
    /// assert_eq!(ForgeProvider::parse("unknown"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(ForgeProvider::GitHub),
            "gitea" | "forgejo" | "codeberg" => Some(ForgeProvider::Gitea),
            _ => None,
        }
    }

    /// Select a provider from the host-platform runtime flag.
    pub fn detect(gitea_actions: bool) -> Self {
        if gitea_actions {
            ForgeProvider::Gitea
        } else {
            ForgeProvider::GitHub
        }
    }
}

impl std::fmt::Display for ForgeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Create a forge for a provider.
///
/// # Arguments
///
/// * `provider` - Which adapter to build
/// * `token` - Opaque credential passed through to the adapter
/// * `api_url` - API base for GitHub, or server URL for Gitea
///
/// # Errors
///
/// `ForgeError::NotConfigured` when Gitea is selected without a server
/// URL; Gitea has no canonical public instance to fall back to.
pub fn create_forge(
    provider: ForgeProvider,
    token: &str,
    api_url: Option<&str>,
) -> Result<Box<dyn Forge>, ForgeError> {
    match provider {
        ForgeProvider::GitHub => {
            let forge = match api_url {
                Some(base) => GitHubForge::with_api_base(token, base),
                None => GitHubForge::new(token),
            };
            Ok(Box::new(forge))
        }
        ForgeProvider::Gitea => {
            let server = api_url.ok_or_else(|| {
                ForgeError::NotConfigured(
                    "Gitea server URL missing. Set GITHUB_SERVER_URL or pass --api-url."
                        .to_string(),
                )
            })?;
            Ok(Box::new(GiteaForge::new(server, token)))
        }
    }
}

/// Get a comma-separated string of available providers.
pub fn available_providers_string() -> String {
    ForgeProvider::all()
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    mod forge_provider {
        use super::*;

        #[test]
        fn name_returns_lowercase() {
            assert_eq!(ForgeProvider::GitHub.name(), "github");
            assert_eq!(ForgeProvider::Gitea.name(), "gitea");
        }

        #[test]
        fn parse_known() {
            assert_eq!(ForgeProvider::parse("github"), Some(ForgeProvider::GitHub));
            assert_eq!(ForgeProvider::parse("GITHUB"), Some(ForgeProvider::GitHub));
            assert_eq!(ForgeProvider::parse("Gitea"), Some(ForgeProvider::Gitea));
            assert_eq!(ForgeProvider::parse("codeberg"), Some(ForgeProvider::Gitea));
        }

        #[test]
        fn parse_unknown() {
            assert_eq!(ForgeProvider::parse("gitlab"), None);
            assert_eq!(ForgeProvider::parse(""), None);
        }

        #[test]
        fn detect_follows_runtime_flag() {
            assert_eq!(ForgeProvider::detect(true), ForgeProvider::Gitea);
            assert_eq!(ForgeProvider::detect(false), ForgeProvider::GitHub);
        }

        #[test]
        fn default_is_github() {
            assert_eq!(ForgeProvider::default(), ForgeProvider::GitHub);
        }

        #[test]
        fn display() {
            assert_eq!(format!("{}", ForgeProvider::Gitea), "gitea");
        }

        #[test]
        fn available_providers_listed_in_order() {
            assert_eq!(available_providers_string(), "github, gitea");
        }
    }

    mod create_forge {
        use super::*;

        #[test]
        fn github_without_api_url() {
            let forge = create_forge(ForgeProvider::GitHub, "token", None).unwrap();
            assert_eq!(forge.name(), "github");
        }

        #[test]
        fn github_with_enterprise_api_url() {
            let forge = create_forge(
                ForgeProvider::GitHub,
                "token",
                Some("https://github.example.com/api/v3"),
            )
            .unwrap();
            assert_eq!(forge.name(), "github");
        }

        #[test]
        fn gitea_with_server_url() {
            let forge =
                create_forge(ForgeProvider::Gitea, "token", Some("https://codeberg.org")).unwrap();
            assert_eq!(forge.name(), "gitea");
        }

        #[test]
        fn gitea_without_server_url_fails() {
            let result = create_forge(ForgeProvider::Gitea, "token", None);
            match result {
                Err(ForgeError::NotConfigured(msg)) => assert!(msg.contains("GITHUB_SERVER_URL")),
                Err(other) => panic!("unexpected error: {other}"),
                Ok(_) => panic!("expected an error"),
            }
        }

    }
}
