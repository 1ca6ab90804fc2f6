//! # Domain Layer
//!
//! Business logic for tracking birthdays, anniversaries and other yearly
//! events. Services here know nothing about HTTP; they take commands, talk to
//! the storage collaborator through [`crate::storage::BirthdayStorage`] and
//! hand back domain values.
//!
//! - [`occurrence`]: next-occurrence and age arithmetic
//! - [`validation`]: request rules and the violation types they produce
//! - [`duplicate_check`]: the (name, date) uniqueness rule applied on create
//! - [`birthday_service`]: CRUD, search and listing orchestration
//! - [`health_service`]: database connectivity probes

pub mod birthday_service;
pub mod clock;
pub mod commands;
pub mod duplicate_check;
pub mod health_service;
pub mod models;
pub mod occurrence;
pub mod validation;

pub use birthday_service::{BirthdayService, BirthdayServiceError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use health_service::{DatabaseHealth, HealthService};
