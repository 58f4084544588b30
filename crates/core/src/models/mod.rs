//! Data models for TutorHub

mod availability;
mod booking;
mod community;
mod time;
mod user;

pub use availability::*;
pub use booking::*;
pub use community::*;
pub use time::*;
pub use user::*;
