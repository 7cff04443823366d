/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `tasks`: Task CRUD, completions and status
/// - `comments`: Comment threads on tasks
/// - `me`: Profile, preferences and profile pictures

pub mod comments;
pub mod health;
pub mod me;
pub mod tasks;
