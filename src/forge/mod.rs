//! forge
//!
//! Abstraction for remote forges (GitHub, Gitea).
//!
//! # Architecture
//!
//! The `Forge` trait defines the comment capabilities the reconciliation
//! core needs. Callers use the [`create_forge`] factory function rather
//! than importing specific forge implementations directly.
//!
//! - Adapters hold no state between calls beyond their HTTP client
//! - Adapter failures are returned unchanged; nothing is retried
//! - Platform payloads are normalized into [`Comment`] inside the adapter
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and shared types
//! - [`github`]: GitHub REST implementation
//! - [`gitea`]: Gitea REST implementation
//! - [`mock`]: Mock implementation for deterministic testing
//! - `factory`: Forge selection and creation
//!
//! # Example
//!
//! ```ignore
//! use pr_commenter::forge::{create_forge, ForgeProvider, RepoRef};
//!
//! let forge = create_forge(ForgeProvider::GitHub, &token, None)?;
//! let repo = RepoRef::new("octocat", "hello-world");
//!
//! let comment = forge.create_comment(&repo, 42, "Build passed").await?;
//! println!("Created comment {}: {}", comment.id, comment.url);
//! ```

mod factory;
pub mod gitea;
pub mod github;
pub mod mock;
mod traits;

pub use factory::{available_providers_string, create_forge, ForgeProvider};
pub use traits::*;
