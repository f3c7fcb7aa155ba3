//! Atelier Booking Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the slot reservation and pricing subsystem. It includes:
//!
//! - Domain models (SlotQuery, HoldOutcome, PackageDraft, PriceQuote, etc.)
//! - Service traits for the calendar gateway and promo store
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
