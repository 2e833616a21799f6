//! Commit types for gitpass.
//!
//! This crate provides [`CommitRecord`], the immutable description of a
//! commit produced or read by the repository layer.

mod record;

pub use record::CommitRecord;
