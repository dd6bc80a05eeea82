//! core
//!
//! Run configuration.
//!
//! # Modules
//!
//! - [`config`] - Invocation parameters, context variables and event payload
//!
//! # Design Principles
//!
//! - Every configuration error surfaces before the first forge call
//! - Resolution reads the environment only through an injected lookup

pub mod config;
