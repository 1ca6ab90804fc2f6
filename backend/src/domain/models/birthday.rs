//! Domain model for a tracked birthday, anniversary or other yearly event.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{EventType, ReminderType, RepeatType, ShowPreference};

use crate::domain::occurrence::OccurrenceCalculation;

/// A stored event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Birthday {
    /// Assigned by storage on insert, never changed afterwards
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub reminder_type: ReminderType,
    pub repeat_type: RepeatType,
    pub event_type: EventType,
    pub show_preference: ShowPreference,
    pub show_age: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Birthday {
    /// Attach an id chosen by storage to a record that has not been stored yet
    pub fn from_new(id: String, new: NewBirthday) -> Self {
        Self {
            id,
            name: new.name,
            date: new.date,
            reminder_type: new.reminder_type,
            repeat_type: new.repeat_type,
            event_type: new.event_type,
            show_preference: new.show_preference,
            show_age: new.show_age,
            created_at: new.created_at,
            updated_at: new.updated_at,
        }
    }
}

/// A validated record waiting to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBirthday {
    pub name: String,
    pub date: NaiveDate,
    pub reminder_type: ReminderType,
    pub repeat_type: RepeatType,
    pub event_type: EventType,
    pub show_preference: ShowPreference,
    pub show_age: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored record together with the values derived from it for a given day.
/// Never persisted; rebuilt on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthdayView {
    pub birthday: Birthday,
    pub occurrence: OccurrenceCalculation,
}
