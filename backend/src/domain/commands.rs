//! Domain-level command types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in
//! the `shared` crate to these internal types.

pub mod birthday {
    use chrono::NaiveDate;
    use shared::{EventType, ReminderType, RepeatType, ShowPreference};

    /// Input for creating a birthday. Fields stay optional until validation
    /// so that every missing field can be reported at once.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct CreateBirthdayCommand {
        pub name: Option<String>,
        pub date: Option<NaiveDate>,
        pub reminder_type: Option<ReminderType>,
        pub repeat_type: Option<RepeatType>,
        pub event_type: Option<EventType>,
        pub show_preference: Option<ShowPreference>,
        pub show_age: Option<bool>,
    }

    /// Input for a partial update. `None` leaves the stored value alone.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct UpdateBirthdayCommand {
        pub name: Option<String>,
        pub date: Option<NaiveDate>,
        pub reminder_type: Option<ReminderType>,
        pub repeat_type: Option<RepeatType>,
        pub event_type: Option<EventType>,
        pub show_preference: Option<ShowPreference>,
        pub show_age: Option<bool>,
    }
}
