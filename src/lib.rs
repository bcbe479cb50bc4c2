//! Library crate for ocm-users.
//!
//! This crate exposes the building blocks of the `users` command:
//! - Listing run, paginator and worker pool (`app`)
//! - Command line definition (`cli`)
//! - Error and result types (`error`)
//! - Table rendering and output sinks (`output`)
//! - Accounts management contracts, REST client and session loading (`remote`)
//! - Role filtering and search scope selection (`search`)
//!
//! It is used by the `ocm-users` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod cli;
pub mod error;
pub mod output;
pub mod remote;
pub mod search;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{Error, Result};
