//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Logging setup, success output and failure reporting
//!
//! # Design
//!
//! The binary writes nothing to stdout except the result line and, inside
//! a workflow runner, the failure annotation. Everything else is a
//! `tracing` event on stderr.

pub mod output;
