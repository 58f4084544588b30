//! Student calendar and booking view model

use std::sync::Mutex;

use tracing::{debug, info, warn};
use tutorhub_core::invariants::{
    assert_bookable_list, assert_booking_invariants, assert_slot_invariants,
};
use tutorhub_core::{
    bookable_slots, Action, AvailabilitySlot, BookingForm, BookingRequest, CalendarMonth, SlotId,
};

use super::{report_failure, report_invalid, require, ActionError};
use crate::state::{lock, AppState};

#[derive(Default)]
struct BookingPage {
    slots: Vec<AvailabilitySlot>,
    bookings: Vec<BookingRequest>,
    form: BookingForm,
    submitting: bool,
    loaded: bool,
}

pub struct BookingViewModel {
    state: AppState,
    page: Mutex<BookingPage>,
}

impl BookingViewModel {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            page: Mutex::new(BookingPage::default()),
        }
    }

    /// Fetch slots and own bookings; the snapshot changes only if both succeed
    pub async fn load(&self) -> Result<(), ActionError> {
        self.fetch()
            .await
            .map_err(|e| report_failure(&self.state.notifier, "load_calendar", &e))
    }

    async fn fetch(&self) -> tutorhub_net::Result<()> {
        let api = &self.state.api;
        let (slots, bookings) = tokio::try_join!(api.list_availabilities(), api.my_bookings())?;
        debug!(slots = slots.len(), bookings = bookings.len(), "Calendar fetched");
        for slot in &slots {
            assert_slot_invariants(slot);
        }
        for booking in &bookings {
            assert_booking_invariants(booking);
        }

        let mut page = lock(&self.page);
        page.slots = slots;
        page.bookings = bookings;
        page.loaded = true;

        // A selection that someone else booked meanwhile is dropped
        if let Some(selected) = page.form.selected_slot {
            let still_open = page.slots.iter().any(|s| s.id == selected && s.is_bookable());
            if !still_open {
                page.form.selected_slot = None;
            }
        }
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        lock(&self.page).loaded
    }

    pub fn bookable_slots(&self) -> Vec<AvailabilitySlot> {
        let slots = bookable_slots(&lock(&self.page).slots);
        assert_bookable_list(&slots);
        slots
    }

    pub fn my_bookings(&self) -> Vec<BookingRequest> {
        lock(&self.page).bookings.clone()
    }

    /// Returns false if the slot is unknown or already booked
    pub fn select_slot(&self, id: SlotId) -> bool {
        let mut page = lock(&self.page);
        let bookable = page.slots.iter().any(|s| s.id == id && s.is_bookable());
        if bookable {
            page.form.selected_slot = Some(id);
        }
        bookable
    }

    pub fn selected_slot(&self) -> Option<SlotId> {
        lock(&self.page).form.selected_slot
    }

    pub fn set_notes(&self, notes: impl Into<String>) {
        lock(&self.page).form.notes = notes.into();
    }

    pub async fn submit(&self) -> Result<BookingRequest, ActionError> {
        require(&self.state.session, Action::RequestBooking)?;

        let request = {
            let mut page = lock(&self.page);
            if page.submitting {
                return Err(ActionError::Busy);
            }
            let validated = page.form.validate();
            if validated.is_ok() {
                page.submitting = true;
            }
            validated
        };
        let request = request.map_err(|e| report_invalid(&self.state.notifier, e))?;

        let result = self.state.api.request_booking(&request).await;
        lock(&self.page).submitting = false;

        match result {
            Ok(booking) => {
                info!(booking_id = booking.id, slot_id = request.availability_id, "Booking requested");
                self.state.notifier.success("Booking request sent");
                lock(&self.page).form = BookingForm::default();
                self.refresh_quietly().await;
                Ok(booking)
            }
            Err(e) => {
                let err = report_failure(&self.state.notifier, "request_booking", &e);
                self.refresh_quietly().await;
                Err(err)
            }
        }
    }

    /// Month grid of open slots and own bookings, `None` for an invalid month
    pub fn calendar_month(&self, year: i32, month: u32) -> Option<CalendarMonth> {
        let page = lock(&self.page);
        let open = bookable_slots(&page.slots);
        CalendarMonth::build(year, month, &open, &page.bookings)
    }

    // The mutation's own toast is enough; a failed follow-up fetch only logs
    async fn refresh_quietly(&self) {
        if let Err(e) = self.fetch().await {
            warn!(error = %e, "Re-fetch after booking failed");
        }
    }
}
