//! Validation rules for birthday requests.
//!
//! Each rule is a plain function returning the cleaned value or a
//! [`Violation`]. The `validate_create` / `validate_update` entry points run
//! every rule and collect all violations before giving up, so a client sees
//! every problem with a request in one response.

use chrono::{Months, NaiveDate};
use shared::{EventType, ReminderType, RepeatType, ShowPreference};
use std::fmt;

use crate::domain::commands::birthday::{CreateBirthdayCommand, UpdateBirthdayCommand};

/// Longest allowed name, counted in characters after trimming
pub const MAX_NAME_LENGTH: usize = 100;

/// How far a date may lie from today in either direction
pub const MAX_YEARS_FROM_TODAY: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    EmptyField,
    MissingField,
    NameTooLong,
    InvalidDate,
    FutureDate,
    OutOfRange,
    DuplicateRecord,
}

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct Violation {
    pub field: &'static str,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(field: &'static str, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    pub fn duplicate() -> Self {
        Self::new(
            "name",
            ViolationKind::DuplicateRecord,
            "A birthday with the same name and date already exists",
        )
    }
}

/// One or more violated rules. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// True if any violation is of the given kind
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// The single violation's message, or a generic summary for several
    pub fn summary(&self) -> &str {
        match self.violations.as_slice() {
            [only] => &only.message,
            _ => "Validation failed",
        }
    }
}

impl From<Violation> for ValidationFailure {
    fn from(violation: Violation) -> Self {
        Self::new(vec![violation])
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}

impl std::error::Error for ValidationFailure {}

/// Fields of a create request that passed every rule
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBirthday {
    pub name: String,
    pub date: NaiveDate,
    pub reminder_type: ReminderType,
    pub repeat_type: RepeatType,
    pub event_type: EventType,
    pub show_preference: ShowPreference,
    pub show_age: bool,
}

/// Gathers violations while rules run
#[derive(Default)]
struct Violations(Vec<Violation>);

impl Violations {
    fn check<T>(&mut self, result: Result<T, Violation>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.0.push(violation);
                None
            }
        }
    }

    fn finish(self) -> Result<(), ValidationFailure> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::new(self.0))
        }
    }
}

/// Record ids used in paths must not be blank. The id is passed through as
/// given.
pub fn validate_id(id: &str) -> Result<&str, Violation> {
    if id.trim().is_empty() {
        return Err(Violation::new("id", ViolationKind::EmptyField, "ID cannot be null or empty"));
    }
    Ok(id)
}

/// Name must be present and non-blank; returns it trimmed
pub fn validate_name(name: Option<&str>) -> Result<String, Violation> {
    let trimmed = name.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(Violation::new("name", ViolationKind::EmptyField, "Name is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(Violation::new(
            "name",
            ViolationKind::NameTooLong,
            format!("Name must be between 1 and {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(trimmed.to_string())
}

/// Search terms must not be blank; returns it trimmed
pub fn validate_search_term(term: Option<&str>) -> Result<String, Violation> {
    let trimmed = term.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(Violation::new("name", ViolationKind::EmptyField, "Search term cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Parse a `YYYY-MM-DD` date coming off the wire
pub fn parse_date(raw: &str) -> Result<NaiveDate, Violation> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        Violation::new(
            "date",
            ViolationKind::InvalidDate,
            format!("Invalid date '{}', expected YYYY-MM-DD", raw),
        )
    })
}

/// A date must lie within 150 years of today in either direction
pub fn validate_date_range(date: NaiveDate, today: NaiveDate) -> Result<(), Violation> {
    let span = Months::new(MAX_YEARS_FROM_TODAY * 12);

    if let Some(latest) = today.checked_add_months(span) {
        if date > latest {
            return Err(Violation::new(
                "date",
                ViolationKind::OutOfRange,
                format!("Date cannot be more than {} years in the future", MAX_YEARS_FROM_TODAY),
            ));
        }
    }
    if let Some(earliest) = today.checked_sub_months(span) {
        if date < earliest {
            return Err(Violation::new(
                "date",
                ViolationKind::OutOfRange,
                format!("Date cannot be more than {} years in the past", MAX_YEARS_FROM_TODAY),
            ));
        }
    }
    Ok(())
}

/// A birthday cannot be in the future. Other event types may be.
pub fn validate_not_future_birthday(
    date: NaiveDate,
    event_type: EventType,
    today: NaiveDate,
) -> Result<(), Violation> {
    if event_type == EventType::Birthday && date > today {
        return Err(Violation::new(
            "date",
            ViolationKind::FutureDate,
            "Birthday date cannot be in the future",
        ));
    }
    Ok(())
}

/// A required field must be present
pub fn require<T>(field: &'static str, value: Option<T>, message: &str) -> Result<T, Violation> {
    value.ok_or_else(|| Violation::new(field, ViolationKind::MissingField, message))
}

/// Run every create-time rule
pub fn validate_create(
    command: CreateBirthdayCommand,
    today: NaiveDate,
) -> Result<ValidatedBirthday, ValidationFailure> {
    let mut violations = Violations::default();

    let name = violations.check(validate_name(command.name.as_deref()));
    let date = violations.check(require("date", command.date, "Date is required"));
    let reminder_type = violations.check(require("reminderType", command.reminder_type, "Reminder type is required"));
    let repeat_type = violations.check(require("repeatType", command.repeat_type, "Repeat type is required"));
    let event_type = violations.check(require("eventType", command.event_type, "Event type is required"));
    let show_preference = violations.check(require("showPreference", command.show_preference, "Show preference is required"));
    let show_age = violations.check(require("showAge", command.show_age, "Show age preference is required"));

    if let Some(date) = date {
        if violations.check(validate_date_range(date, today)).is_some() {
            if let Some(event_type) = event_type {
                violations.check(validate_not_future_birthday(date, event_type, today));
            }
        }
    }

    let (Some(name), Some(date), Some(reminder_type), Some(repeat_type), Some(event_type), Some(show_preference), Some(show_age)) =
        (name, date, reminder_type, repeat_type, event_type, show_preference, show_age)
    else {
        return Err(ValidationFailure::new(violations.0));
    };
    violations.finish()?;

    Ok(ValidatedBirthday {
        name,
        date,
        reminder_type,
        repeat_type,
        event_type,
        show_preference,
        show_age,
    })
}

/// Run every update-time rule. The name is always required; a date is only
/// range checked when one is supplied. Returns the trimmed name.
pub fn validate_update(command: &UpdateBirthdayCommand, today: NaiveDate) -> Result<String, ValidationFailure> {
    let mut violations = Violations::default();

    let name = violations.check(validate_name(command.name.as_deref()));
    if let Some(date) = command.date {
        violations.check(validate_date_range(date, today));
    }

    match name {
        Some(name) => {
            violations.finish()?;
            Ok(name)
        }
        None => Err(ValidationFailure::new(violations.0)),
    }
}
