//! Role-aware page navigation

use std::sync::Mutex;

use tracing::debug;
use tutorhub_core::{Page, PermissionMatrix, Role};

use super::ActionError;
use crate::state::{lock, SessionContext};

/// One entry in the side menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub page: Page,
    pub title: &'static str,
    pub active: bool,
}

pub struct Navigation {
    session: SessionContext,
    current: Mutex<Option<Page>>,
}

impl Navigation {
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            current: Mutex::new(None),
        }
    }

    /// Menu for the logged-in role; empty when logged out
    pub fn menu(&self) -> Vec<MenuItem> {
        let Some(role) = self.session.role() else {
            return Vec::new();
        };
        let current = self.current();
        PermissionMatrix::pages_for(role)
            .iter()
            .map(|&page| MenuItem {
                page,
                title: page.title(),
                active: current == Some(page),
            })
            .collect()
    }

    /// Switch to the role's home page
    pub fn enter_shell(&self, role: Role) -> Page {
        let home = PermissionMatrix::home_page(role);
        *lock(&self.current) = Some(home);
        home
    }

    pub fn navigate(&self, page: Page) -> Result<Page, ActionError> {
        let Some(role) = self.session.role() else {
            return Err(ActionError::Unauthenticated);
        };
        if !PermissionMatrix::can_open(role, page) {
            debug!(page = page.slug(), role = role.as_str(), "Page not in menu");
            return Err(ActionError::NotFound);
        }
        *lock(&self.current) = Some(page);
        Ok(page)
    }

    pub fn current(&self) -> Option<Page> {
        *lock(&self.current)
    }

    pub fn reset(&self) {
        *lock(&self.current) = None;
    }
}
