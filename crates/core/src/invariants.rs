//! Developer guardrails and invariants
//!
//! Debug assertions for states the backend should never hand us.
//! These checks are compiled out in release builds.

use crate::models::{AvailabilitySlot, BookingRequest, BookingStatus, DayOfWeek, ScheduleEntry};

/// A list shown to students as bookable must not contain booked slots
pub fn assert_bookable_list(slots: &[AvailabilitySlot]) {
    debug_assert!(
        slots.iter().all(|s| !s.is_booked),
        "Bookable list contains booked slot(s): {:?}",
        slots.iter().filter(|s| s.is_booked).map(|s| s.id).collect::<Vec<_>>()
    );
}

/// A slot needs a weekday or a concrete date
pub fn assert_slot_invariants(slot: &AvailabilitySlot) {
    debug_assert!(
        slot.day_of_week.is_some() || slot.date.is_some(),
        "Slot {} has neither dayOfWeek nor date",
        slot.id
    );
}

/// A booking references one slot or one explicit window
pub fn assert_booking_invariants(booking: &BookingRequest) {
    debug_assert!(
        booking.has_target(),
        "Booking {} references neither a slot nor a date/time window",
        booking.id
    );
}

/// A re-fetched request must not have moved backwards
pub fn assert_status_progress(before: BookingStatus, after: BookingStatus) {
    debug_assert!(
        before == after || before.can_transition_to(after),
        "Booking status regressed: {} -> {}",
        before,
        after
    );
}

/// Schedule rows are kept Monday first, Sunday last
pub fn assert_schedule_sorted(entries: &[ScheduleEntry]) {
    debug_assert!(
        entries.windows(2).all(|w| {
            let rank = |d: DayOfWeek| d.display_rank();
            (rank(w[0].day_of_week), w[0].start_time) <= (rank(w[1].day_of_week), w[1].start_time)
        }),
        "Schedule is not in Monday-first order"
    );
}
