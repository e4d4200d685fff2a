//! Core use-case services.
//!
//! # Responsibility
//! - Own the shared store handle and serialize access to it.
//! - Keep view/CLI layers decoupled from connection management.

pub mod news_store;
