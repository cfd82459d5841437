//! # Tasklist Shared Library
//!
//! This crate contains the types, storage access and business logic used by
//! the Tasklist API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, bearer tokens and request authentication
//! - `db`: Connection pool and migrations
//! - `models`: Database models and data structures
//! - `store`: Storage traits with PostgreSQL and in-memory implementations
//! - `services`: Ownership-scoped task operations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Tasklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
