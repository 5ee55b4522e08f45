//! Web server for the moderation pipeline.

pub mod app;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;
