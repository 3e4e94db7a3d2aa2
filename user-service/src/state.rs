//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::repository::UserRepository;
use crate::service::{ServiceSettings, UserService};

/// Application state shared across handlers
///
/// Generic over the user store so the same router serves Postgres in
/// production and the in-memory store in tests.
pub struct AppState<R> {
    config: Arc<Config>,
    users: UserService<R>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            users: self.users.clone(),
        }
    }
}

impl<R: UserRepository> AppState<R> {
    /// Create the state, taking paging and filter policy from the configuration
    pub fn new(config: Config, repository: R) -> Self {
        let settings = ServiceSettings::from_config(&config);
        Self {
            config: Arc::new(config),
            users: UserService::new(Arc::new(repository), settings),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the user service
    pub fn users(&self) -> &UserService<R> {
        &self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::MalformedPolicy;
    use crate::repository::InMemoryUserRepository;

    #[test]
    fn test_settings_follow_config() {
        let mut config = Config::default();
        config.pagination.default_page_size = 5;
        config.filter.malformed = MalformedPolicy::Reject;

        let state = AppState::new(config, InMemoryUserRepository::new());
        assert_eq!(state.users().settings().default_page_size, 5);
        assert_eq!(state.users().settings().malformed, MalformedPolicy::Reject);

        let cloned = state.clone();
        assert_eq!(cloned.config().pagination.default_page_size, 5);
    }
}
