//! View models, one per page
//!
//! Each view model owns the snapshot its page last fetched and exposes the
//! page's operations. Snapshots are refreshed after every mutation instead
//! of being patched locally.

mod auth;
mod booking;
mod community;
mod navigation;
mod pages;
mod tutor;

pub use auth::{AuthViewModel, Screen};
pub use booking::BookingViewModel;
pub use community::CommunityViewModel;
pub use navigation::Navigation;
pub use pages::{
    FeedbackViewModel, LibraryViewModel, MatchingViewModel, ProfileViewModel, ReportsViewModel,
    SessionRecordViewModel,
};
pub use tutor::{DashboardTab, TutorDashboardViewModel};

use tracing::{error, warn};
use tutorhub_core::{Action, ValidationError};
use tutorhub_net::FailureKind;

use crate::notify::Notifier;
use crate::state::SessionContext;

/// Why a page operation did not go through
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Not allowed for this role: {0:?}")]
    Forbidden(Action),

    #[error("Already in progress")]
    Busy,

    #[error("Request is no longer pending")]
    NotPending,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Rejected(String),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Connection error")]
    Network,
}

/// Fail with `Forbidden` unless the session role allows the action
pub(crate) fn require(session: &SessionContext, action: Action) -> Result<(), ActionError> {
    if session.can(action) {
        Ok(())
    } else {
        Err(ActionError::Forbidden(action))
    }
}

/// Turn a backend failure into a toast and the matching `ActionError`
pub(crate) fn report_failure(
    notifier: &Notifier,
    operation: &str,
    err: &tutorhub_net::Error,
) -> ActionError {
    match err.kind() {
        FailureKind::Rejected => {
            let message = err.user_message();
            warn!(operation, message = %message, "Backend rejected request");
            notifier.error(message.clone());
            ActionError::Rejected(message)
        }
        FailureKind::Authentication => {
            warn!(operation, "Session no longer valid");
            notifier.warning("Your session has expired. Please log in again.");
            ActionError::Unauthenticated
        }
        FailureKind::Network => {
            error!(operation, error = %err, "Request failed");
            notifier.error("Connection error");
            ActionError::Network
        }
    }
}

/// Surface a validation failure as a warning toast
pub(crate) fn report_invalid(notifier: &Notifier, err: ValidationError) -> ActionError {
    notifier.warning(err.to_string());
    ActionError::Invalid(err)
}
