//! TutorHub Core Library
//!
//! Domain models, roles and permissions, calendar derivations, form
//! validation and configuration for the TutorHub client.

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod error;
pub mod forms;
pub mod insights;
pub mod invariants;
pub mod models;
pub mod permissions;

pub use calendar::{bookable_slots, sort_schedule, CalendarDay, CalendarMonth};
pub use config::ClientConfig;
pub use error::{Error, Result, ValidationError};
pub use forms::{BookingForm, PostForm, ScheduleForm};
pub use models::*;
pub use permissions::*;
