//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from the store and view layers.
//!
//! # Invariants
//! - Repository writes store title/content exactly as given.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Each repository call issues exactly one SQL statement.

pub mod news_repo;
