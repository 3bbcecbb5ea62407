//! Infrastructure Layer - Runtime Storage
//!
//! Concrete storage for domain objects that is tied to the execution
//! environment rather than to the domain itself.
//!
//! # Responsibilities
//! - Per-thread state table caching (`thread_local!`)

pub mod thread_cache;

pub use thread_cache::{release_thread_table, with_thread_table, ThreadCacheError};
