//! Application state for the web server.

use std::sync::Arc;

use stegward::ModerationQueue;

use super::auth::AuthConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The moderation queue backing all photo routes.
    pub queue: Arc<ModerationQueue>,
    /// Moderator credentials and token keys.
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    /// Create new application state.
    pub fn new(queue: ModerationQueue, auth: AuthConfig) -> Self {
        Self {
            queue: Arc::new(queue),
            auth: Arc::new(auth),
        }
    }
}
