//! Authentication view model

use std::sync::Mutex;

use tracing::{info, warn};
use tutorhub_core::forms::validate_credentials;
use tutorhub_core::Role;
use tutorhub_net::FailureKind;

use crate::state::{lock, AppState};

/// Top-level screen the app should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Shell(Role),
}

pub struct AuthViewModel {
    state: AppState,
    auth_error: Mutex<Option<String>>,
}

impl AuthViewModel {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            auth_error: Mutex::new(None),
        }
    }

    /// Resolve the screen from whatever session the backend still holds.
    ///
    /// Any failure lands on the login screen without a toast.
    pub async fn bootstrap(&self) -> Screen {
        match self.state.api.current_user().await {
            Ok(user) => {
                info!(email = %user.email, role = user.role.as_str(), "Resumed session");
                let role = user.role;
                self.state.session.set_user(Some(user));
                Screen::Shell(role)
            }
            Err(e) => {
                if e.kind() != FailureKind::Authentication {
                    warn!(error = %e, "Could not resolve current user");
                }
                self.state.session.set_user(None);
                Screen::Login
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Screen {
        let credentials = match validate_credentials(email, password) {
            Ok(c) => c,
            Err(e) => {
                self.set_error(Some(e.to_string()));
                return Screen::Login;
            }
        };

        let result = match self.state.api.login(&credentials).await {
            Ok(()) => self.state.api.current_user().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => {
                info!(email = %user.email, role = user.role.as_str(), "Logged in");
                let role = user.role;
                self.state.session.set_user(Some(user));
                self.set_error(None);
                Screen::Shell(role)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                let message = match e.kind() {
                    FailureKind::Authentication => "Invalid email or password".to_string(),
                    _ => e.user_message(),
                };
                self.set_error(Some(message));
                Screen::Login
            }
        }
    }

    /// Ends the session locally even if the backend call fails
    pub async fn logout(&self) -> Screen {
        match self.state.api.logout().await {
            Ok(()) => self.state.notifier.info("You have been logged out"),
            Err(e) => {
                warn!(error = %e, "Logout request failed");
                self.state
                    .notifier
                    .warning("Could not reach the server; you have been logged out locally");
            }
        }
        self.state.session.set_user(None);
        self.set_error(None);
        Screen::Login
    }

    pub fn auth_error(&self) -> Option<String> {
        lock(&self.auth_error).clone()
    }

    fn set_error(&self, message: Option<String>) {
        *lock(&self.auth_error) = message;
    }
}
