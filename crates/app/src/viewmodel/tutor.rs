//! Tutor dashboard: weekly availability and incoming booking requests

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, info, warn};
use tutorhub_core::calendar::schedule_by_day;
use tutorhub_core::invariants::{assert_schedule_sorted, assert_status_progress};
use tutorhub_core::models::pending_count;
use tutorhub_core::{
    sort_schedule, Action, BookingDecision, BookingId, BookingRequest, DayOfWeek, ScheduleEntry,
    ScheduleEntryId, ScheduleForm,
};

use super::{report_failure, report_invalid, require, ActionError};
use crate::state::{lock, AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Schedule,
    Requests,
}

/// "Add availability" dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDialog {
    pub open: bool,
    pub form: ScheduleForm,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Default)]
struct DashboardPage {
    schedule: Vec<ScheduleEntry>,
    requests: Vec<BookingRequest>,
    tab: DashboardTab,
    dialog: ScheduleDialog,
    deciding: HashSet<BookingId>,
}

pub struct TutorDashboardViewModel {
    state: AppState,
    page: Mutex<DashboardPage>,
}

impl TutorDashboardViewModel {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            page: Mutex::new(DashboardPage::default()),
        }
    }

    pub async fn load(&self) -> Result<(), ActionError> {
        self.fetch()
            .await
            .map_err(|e| report_failure(&self.state.notifier, "load_dashboard", &e))
    }

    async fn fetch(&self) -> tutorhub_net::Result<()> {
        let api = &self.state.api;
        let (mut schedule, requests) =
            tokio::try_join!(api.tutor_schedule(), api.tutor_booking_requests())?;
        sort_schedule(&mut schedule);
        assert_schedule_sorted(&schedule);
        debug!(entries = schedule.len(), requests = requests.len(), "Dashboard fetched");

        let mut page = lock(&self.page);
        for fresh in &requests {
            if let Some(old) = page.requests.iter().find(|r| r.id == fresh.id) {
                assert_status_progress(old.status, fresh.status);
            }
        }
        page.schedule = schedule;
        page.requests = requests;
        Ok(())
    }

    async fn refresh_quietly(&self) {
        if let Err(e) = self.fetch().await {
            warn!(error = %e, "Dashboard re-fetch failed");
        }
    }

    pub fn schedule(&self) -> Vec<ScheduleEntry> {
        lock(&self.page).schedule.clone()
    }

    /// Schedule grouped per weekday, Monday first
    pub fn schedule_by_day(&self) -> Vec<(DayOfWeek, Vec<ScheduleEntry>)> {
        schedule_by_day(&lock(&self.page).schedule)
    }

    pub fn requests(&self) -> Vec<BookingRequest> {
        lock(&self.page).requests.clone()
    }

    pub fn pending_requests(&self) -> Vec<BookingRequest> {
        lock(&self.page)
            .requests
            .iter()
            .filter(|r| r.is_pending())
            .cloned()
            .collect()
    }

    /// Badge on the requests tab
    pub fn pending_count(&self) -> usize {
        pending_count(&lock(&self.page).requests)
    }

    pub fn tab(&self) -> DashboardTab {
        lock(&self.page).tab
    }

    pub fn select_tab(&self, tab: DashboardTab) {
        lock(&self.page).tab = tab;
    }

    // Dialog

    pub fn dialog(&self) -> ScheduleDialog {
        lock(&self.page).dialog.clone()
    }

    pub fn open_dialog(&self) {
        lock(&self.page).dialog = ScheduleDialog {
            open: true,
            ..ScheduleDialog::default()
        };
    }

    pub fn close_dialog(&self) {
        lock(&self.page).dialog = ScheduleDialog::default();
    }

    pub fn set_day(&self, day: DayOfWeek) {
        lock(&self.page).dialog.form.day_of_week = day;
    }

    pub fn set_start(&self, value: impl Into<String>) {
        lock(&self.page).dialog.form.start_time = value.into();
    }

    pub fn set_end(&self, value: impl Into<String>) {
        lock(&self.page).dialog.form.end_time = value.into();
    }

    /// Create the entry described by the dialog.
    ///
    /// Failures keep the dialog open with the reason in `dialog().error`.
    pub async fn submit_dialog(&self) -> Result<ScheduleEntry, ActionError> {
        require(&self.state.session, Action::ManageAvailability)?;

        let validated = {
            let mut page = lock(&self.page);
            if page.dialog.submitting {
                return Err(ActionError::Busy);
            }
            let validated = page.dialog.form.validate();
            match &validated {
                Ok(_) => {
                    page.dialog.submitting = true;
                    page.dialog.error = None;
                }
                Err(e) => page.dialog.error = Some(e.to_string()),
            }
            validated
        };
        let entry = validated.map_err(|e| report_invalid(&self.state.notifier, e))?;

        let result = self.state.api.create_schedule_entry(&entry).await;
        match result {
            Ok(created) => {
                info!(
                    entry_id = created.id,
                    day = created.day_of_week.index(),
                    "Availability added"
                );
                lock(&self.page).dialog = ScheduleDialog::default();
                self.state.notifier.success("Availability added");
                self.refresh_quietly().await;
                Ok(created)
            }
            Err(e) => {
                let err = report_failure(&self.state.notifier, "create_schedule_entry", &e);
                let mut page = lock(&self.page);
                page.dialog.submitting = false;
                page.dialog.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn delete_entry(&self, id: ScheduleEntryId) -> Result<(), ActionError> {
        require(&self.state.session, Action::ManageAvailability)?;

        let result = self.state.api.delete_schedule_entry(id).await;
        let outcome = match result {
            Ok(()) => {
                info!(entry_id = id, "Availability removed");
                self.state.notifier.success("Availability removed");
                Ok(())
            }
            Err(e) => Err(report_failure(&self.state.notifier, "delete_schedule_entry", &e)),
        };
        self.refresh_quietly().await;
        outcome
    }

    pub async fn confirm(&self, id: BookingId) -> Result<BookingRequest, ActionError> {
        self.decide(id, BookingDecision::Confirm).await
    }

    pub async fn reject(&self, id: BookingId) -> Result<BookingRequest, ActionError> {
        self.decide(id, BookingDecision::Reject).await
    }

    async fn decide(
        &self,
        id: BookingId,
        decision: BookingDecision,
    ) -> Result<BookingRequest, ActionError> {
        require(&self.state.session, Action::DecideBookingRequest)?;

        {
            let mut page = lock(&self.page);
            let status = page
                .requests
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.status)
                .ok_or(ActionError::NotFound)?;
            if !status.can_transition_to(decision.target_status()) {
                drop(page);
                self.state
                    .notifier
                    .warning(format!("This request is already {}", status));
                return Err(ActionError::NotPending);
            }
            if !page.deciding.insert(id) {
                return Err(ActionError::Busy);
            }
        }

        let result = self.state.api.decide_booking_request(id, decision).await;
        lock(&self.page).deciding.remove(&id);

        let outcome = match result {
            Ok(updated) => {
                info!(booking_id = id, status = %updated.status, "Booking request decided");
                let message = match decision {
                    BookingDecision::Confirm => "Booking confirmed",
                    BookingDecision::Reject => "Booking rejected",
                };
                self.state.notifier.success(message);
                Ok(updated)
            }
            Err(e) => Err(report_failure(&self.state.notifier, "decide_booking_request", &e)),
        };
        self.refresh_quietly().await;
        outcome
    }
}
