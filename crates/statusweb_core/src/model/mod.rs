//! Domain model for the news feed.
//!
//! # Responsibility
//! - Define the canonical news record read back from storage.
//! - Define the write model and its validation rules.
//!
//! # Invariants
//! - Every news entry is identified by a store-assigned `NewsId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod news;
