//! Core library for gitpass.
//!
//! This crate owns the [`Client`]: an explicitly opened and closed session
//! that hands out typed [`RepoHandle`]s and exposes the flat operation table
//! (clone, stage, commit, push, ...) with plain integer [`Status`] results.

mod client;
mod error;
mod handle;
mod status;

pub use client::Client;
pub use error::{CoreError, CoreResult};
pub use handle::RepoHandle;
pub use status::Status;
