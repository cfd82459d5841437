/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `users`: The authenticated user's account
/// - `tasks`: Task CRUD scoped to the authenticated user

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
