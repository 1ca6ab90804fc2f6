use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status string carried by every successful response envelope
pub const STATUS_SUCCESS: &str = "success";

/// When a reminder for the event should fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderType {
    None,
    SameDay,
    OneDayBefore,
    OneWeekBefore,
    Custom,
}

/// How often the event recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatType {
    Never,
    Yearly,
    Monthly,
    Weekly,
}

/// Kind of event being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Birthday,
    Anniversary,
    Holiday,
    Other,
}

/// Who may see the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShowPreference {
    Public,
    Private,
    FriendsOnly,
}

/// Error returned when a wire string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Implements the SCREAMING_SNAKE_CASE wire names for an enum, with
/// case-insensitive parsing so `birthday` and `BIRTHDAY` both work in URLs.
macro_rules! wire_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants in declaration order
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// The name used on the wire and in storage
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let upper = s.trim().to_ascii_uppercase();
                match upper.as_str() {
                    $($wire => Ok($ty::$variant),)+
                    _ => Err(UnknownVariant { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

wire_enum!(ReminderType, "reminder type", {
    None => "NONE",
    SameDay => "SAME_DAY",
    OneDayBefore => "ONE_DAY_BEFORE",
    OneWeekBefore => "ONE_WEEK_BEFORE",
    Custom => "CUSTOM",
});

wire_enum!(RepeatType, "repeat type", {
    Never => "NEVER",
    Yearly => "YEARLY",
    Monthly => "MONTHLY",
    Weekly => "WEEKLY",
});

wire_enum!(EventType, "event type", {
    Birthday => "BIRTHDAY",
    Anniversary => "ANNIVERSARY",
    Holiday => "HOLIDAY",
    Other => "OTHER",
});

wire_enum!(ShowPreference, "show preference", {
    Public => "PUBLIC",
    Private => "PRIVATE",
    FriendsOnly => "FRIENDS_ONLY",
});

/// A birthday or other yearly event as presented to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Birthday {
    pub id: String,
    pub name: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub reminder_type: ReminderType,
    pub repeat_type: RepeatType,
    pub event_type: EventType,
    pub show_preference: ShowPreference,
    pub show_age: bool,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
    /// Days until the next occurrence, computed when the response is built
    pub days_until_next: i64,
    /// Age in whole years as of today, computed when the response is built
    pub age: i32,
}

/// Body of `POST /api/birthdays`.
///
/// Every field is optional on the wire so that missing values surface as
/// validation errors listing each field, instead of a single parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBirthdayRequest {
    pub name: Option<String>,
    /// Calendar date (YYYY-MM-DD)
    pub date: Option<String>,
    pub reminder_type: Option<ReminderType>,
    pub repeat_type: Option<RepeatType>,
    pub event_type: Option<EventType>,
    pub show_preference: Option<ShowPreference>,
    pub show_age: Option<bool>,
}

/// Body of `PUT /api/birthdays/{id}`. Absent fields keep their stored value;
/// `name` is always required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBirthdayRequest {
    pub name: Option<String>,
    /// Calendar date (YYYY-MM-DD)
    pub date: Option<String>,
    pub reminder_type: Option<ReminderType>,
    pub repeat_type: Option<RepeatType>,
    pub event_type: Option<EventType>,
    pub show_preference: Option<ShowPreference>,
    pub show_age: Option<bool>,
}

/// Query string of `GET /api/birthdays`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBirthdaysQuery {
    pub event_type: Option<String>,
    pub days_ahead: Option<i64>,
}

/// Query string of `GET /api/birthdays/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchBirthdaysQuery {
    pub name: Option<String>,
}

/// Query string of `GET /api/birthdays/upcoming`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBirthdaysQuery {
    pub days: Option<i64>,
}

/// Envelope for endpoints returning a single birthday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthdayResponse {
    pub status: String,
    pub message: String,
    pub data: Birthday,
}

/// Envelope for endpoints returning a list of birthdays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayListResponse {
    pub status: String,
    pub message: String,
    pub data: Vec<Birthday>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_ahead: Option<i64>,
}

impl BirthdayListResponse {
    /// Build a plain list envelope; extras are filled in by the caller
    pub fn new(message: &str, data: Vec<Birthday>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: message.to_string(),
            count: data.len(),
            data,
            search_term: None,
            event_type: None,
            days_ahead: None,
        }
    }
}

/// Envelope for `DELETE /api/birthdays/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteBirthdayResponse {
    pub status: String,
    pub message: String,
    pub id: String,
}

/// Result of `GET /api/database/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStatusResponse {
    /// "connected" or "disconnected"
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of `GET /api/database/ping`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabasePingResponse {
    /// "success" or "failed"
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Round trip in the form "12ms"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// HTTP reason, e.g. "Validation Error" or "Not Found"
    pub error: String,
    /// Request path that failed
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
    /// Local time, "yyyy-MM-dd HH:mm:ss"
    pub timestamp: String,
}
