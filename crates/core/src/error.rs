//! Error types for TutorHub Core

use thiserror::Error;

use crate::models::BookingStatus;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: BookingStatus, to: BookingStatus },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Form input rejected before any request is issued
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select a time slot first")]
    NoSlotSelected,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid time for {field}: {value:?} (expected HH:MM)")]
    InvalidTime { field: &'static str, value: String },

    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
