//! pr-commenter - Keep one tagged comment per pull request up to date
//!
//! A single-binary tool for CI workflows on GitHub and Gitea. Each run
//! posts a comment, or finds the comment an earlier run left (identified
//! by a hidden tag marker) and updates or recreates it, then adds
//! reactions to whichever comment is current.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, runs one reconciliation)
//! - [`comment`] - Marker, search, reaction and reconciliation logic
//! - [`core`] - Configuration resolution
//! - [`forge`] - Abstraction for remote forges (GitHub, Gitea)
//! - [`ui`] - Logging and failure output
//!
//! # Correctness Invariants
//!
//! 1. The comment history is paged until an empty page, never by count
//! 2. Each run issues at most one create, one update and one delete
//! 3. A failed delete never leaves a duplicate comment behind
//! 4. Reaction failures never fail the run

pub mod cli;
pub mod comment;
pub mod core;
pub mod forge;
pub mod ui;
