//! # REST API Interface Layer
//!
//! HTTP endpoints for the birthday tracker. Handlers translate between the
//! shared DTOs and domain commands, and turn domain errors into the JSON
//! error body via [`error::ApiError`]. No business rules live here.

pub mod birthday_apis;
pub mod database_apis;
pub mod error;
pub mod mappers;

pub use error::ApiError;
