//! Data Transfer Objects (DTOs) for API requests and responses

pub mod booking;

pub use booking::*;
