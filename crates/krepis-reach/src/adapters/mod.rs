//! Adapters Layer - Table Ownership for Drivers
//!
//! Connects an external search driver's workers to domain tables without
//! relying on thread identity.

pub mod pool;

pub use pool::{PoolError, PoolSnapshot, TableGuard, TablePool, WorkerId};
