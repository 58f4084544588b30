//! Role-based pages and actions

use crate::models::Role;

/// Pages reachable from the navigation shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Calendar,
    TutorDashboard,
    Community,
    Profile,
    Feedback,
    Library,
    Reports,
    Matching,
    SessionRecord,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Calendar => "Book a Session",
            Page::TutorDashboard => "Tutor Dashboard",
            Page::Community => "Community",
            Page::Profile => "Profile",
            Page::Feedback => "Feedback",
            Page::Library => "Library",
            Page::Reports => "Reports",
            Page::Matching => "Matching",
            Page::SessionRecord => "Session Records",
        }
    }

    /// Short identifier used by the console front end
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Calendar => "calendar",
            Page::TutorDashboard => "dashboard",
            Page::Community => "community",
            Page::Profile => "profile",
            Page::Feedback => "feedback",
            Page::Library => "library",
            Page::Reports => "reports",
            Page::Matching => "matching",
            Page::SessionRecord => "records",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::all()
            .iter()
            .copied()
            .find(|p| p.slug().eq_ignore_ascii_case(slug))
    }

    pub fn all() -> &'static [Page] {
        &[
            Page::Calendar,
            Page::TutorDashboard,
            Page::Community,
            Page::Profile,
            Page::Feedback,
            Page::Library,
            Page::Reports,
            Page::Matching,
            Page::SessionRecord,
        ]
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Mutating actions gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Booking
    RequestBooking,

    // Tutor dashboard
    ManageAvailability,
    DecideBookingRequest,
    RecordSession,

    // Community
    CreatePost,
    CreateComment,

    // Admin tools
    ViewReports,
    RunMatching,

    // Everyone
    SubmitFeedback,
    EditProfile,
}

/// Permission matrix for session roles
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Menu entries for a role, in display order
    pub fn pages_for(role: Role) -> &'static [Page] {
        match role {
            Role::Student => &[
                Page::Calendar,
                Page::Community,
                Page::Feedback,
                Page::Library,
                Page::Profile,
            ],
            Role::Tutor => &[
                Page::TutorDashboard,
                Page::Community,
                Page::SessionRecord,
                Page::Library,
                Page::Profile,
            ],
            Role::Admin => &[
                Page::Reports,
                Page::Matching,
                Page::Community,
                Page::Library,
                Page::Profile,
            ],
        }
    }

    /// Landing page after login
    pub fn home_page(role: Role) -> Page {
        Self::pages_for(role)[0]
    }

    pub fn can_open(role: Role, page: Page) -> bool {
        Self::pages_for(role).contains(&page)
    }

    /// Check if a role may perform an action
    pub fn can_perform(role: Role, action: Action) -> bool {
        match action {
            Action::RequestBooking => role == Role::Student,

            Action::ManageAvailability => role == Role::Tutor,
            Action::DecideBookingRequest => role == Role::Tutor,
            Action::RecordSession => role == Role::Tutor,

            // Discussion is open to every member
            Action::CreatePost | Action::CreateComment => true,

            Action::ViewReports => role == Role::Admin,
            Action::RunMatching => role == Role::Admin,

            Action::SubmitFeedback => role == Role::Student,
            Action::EditProfile => true,
        }
    }
}
