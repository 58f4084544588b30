//! Application state management

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tutorhub_core::{Action, PermissionMatrix, Role, User};
use tutorhub_net::TutoringApi;

use crate::notify::Notifier;

/// Backend handle shared by every page
pub type SharedApi = Arc<dyn TutoringApi>;

/// Lock a mutex, recovering the data if a panicking thread poisoned it
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Who is logged in.
///
/// Pages read it; only the auth view model writes it.
#[derive(Clone, Default)]
pub struct SessionContext {
    user: Arc<RwLock<Option<User>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|u| u.role)
    }

    pub fn email(&self) -> Option<String> {
        self.current_user().map(|u| u.email)
    }

    pub fn is_logged_in(&self) -> bool {
        self.role().is_some()
    }

    /// Whether the current role may perform an action
    pub fn can(&self, action: Action) -> bool {
        self.role()
            .map_or(false, |role| PermissionMatrix::can_perform(role, action))
    }

    pub(crate) fn set_user(&self, user: Option<User>) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = user;
    }
}

/// Main application state, cloned into each view model
#[derive(Clone)]
pub struct AppState {
    pub api: SharedApi,
    pub session: SessionContext,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(api: SharedApi) -> Self {
        Self {
            api,
            session: SessionContext::new(),
            notifier: Notifier::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{student, tutor};

    #[test]
    fn test_session_starts_logged_out() {
        let session = SessionContext::new();
        assert!(!session.is_logged_in());
        assert!(!session.can(Action::EditProfile));
    }

    #[test]
    fn test_session_shared_between_clones() {
        let session = SessionContext::new();
        let reader = session.clone();

        session.set_user(Some(student()));
        assert_eq!(reader.role(), Some(Role::Student));
        assert!(reader.can(Action::RequestBooking));

        session.set_user(Some(tutor()));
        assert!(!reader.can(Action::RequestBooking));
        assert_eq!(reader.email().as_deref(), Some("dana@uni.edu"));

        session.set_user(None);
        assert!(!reader.is_logged_in());
    }
}
