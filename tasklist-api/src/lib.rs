//! # Tasklist API Server Library
//!
//! HTTP layer of the Tasklist service: registration, login and per-user
//! task management over JSON.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
