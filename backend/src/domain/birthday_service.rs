use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::clock::Clock;
use crate::domain::commands::birthday::{CreateBirthdayCommand, UpdateBirthdayCommand};
use crate::domain::duplicate_check::ensure_not_duplicate;
use crate::domain::models::birthday::{Birthday, BirthdayView, NewBirthday};
use crate::domain::occurrence::OccurrenceCalculation;
use crate::domain::validation::{self, ValidationFailure, Violation};
use crate::storage::{BirthdayStorage, StorageError};
use shared::EventType;

/// Errors surfaced by [`BirthdayService`]
#[derive(Debug, thiserror::Error)]
pub enum BirthdayServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error("Birthday not found with id: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(StorageError),
    #[error("{0}")]
    Unexpected(String),
}

impl From<Violation> for BirthdayServiceError {
    fn from(violation: Violation) -> Self {
        Self::Validation(violation.into())
    }
}

impl From<StorageError> for BirthdayServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::CorruptRecord { .. } => Self::Unexpected(err.to_string()),
            StorageError::Unavailable(_) => Self::Storage(err),
        }
    }
}

pub type ServiceResult<T> = Result<T, BirthdayServiceError>;

/// Service for managing birthdays and other yearly events
#[derive(Clone)]
pub struct BirthdayService {
    storage: Arc<dyn BirthdayStorage>,
    clock: Arc<dyn Clock>,
}

impl BirthdayService {
    pub fn new(storage: Arc<dyn BirthdayStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Create a new birthday
    pub async fn create_birthday(&self, command: CreateBirthdayCommand) -> ServiceResult<BirthdayView> {
        info!("Creating birthday: name={:?}, date={:?}", command.name, command.date);

        let today = self.clock.today();
        let validated = validation::validate_create(command, today)?;
        ensure_not_duplicate(self.storage.as_ref(), &validated.name, validated.date).await?;

        let now = self.clock.now();
        let new = NewBirthday {
            name: validated.name,
            date: validated.date,
            reminder_type: validated.reminder_type,
            repeat_type: validated.repeat_type,
            event_type: validated.event_type,
            show_preference: validated.show_preference,
            show_age: validated.show_age,
            created_at: now,
            updated_at: now,
        };

        let birthday = self.storage.insert(new).await?;
        info!("Created birthday: {} with ID: {}", birthday.name, birthday.id);

        self.present(birthday)
    }

    /// Get a birthday by ID
    pub async fn get_birthday(&self, id: &str) -> ServiceResult<BirthdayView> {
        let id = validation::validate_id(id)?;
        debug!("Getting birthday: {}", id);

        match self.storage.find_by_id(id).await? {
            Some(birthday) => self.present(birthday),
            None => {
                warn!("Birthday not found: {}", id);
                Err(BirthdayServiceError::NotFound(id.to_string()))
            }
        }
    }

    /// Update an existing birthday. Only supplied fields are changed.
    pub async fn update_birthday(&self, id: &str, command: UpdateBirthdayCommand) -> ServiceResult<BirthdayView> {
        let id = validation::validate_id(id)?;
        info!("Updating birthday: {}", id);

        let name = validation::validate_update(&command, self.clock.today())?;

        let mut birthday = self
            .storage
            .find_by_id(id)
            .await?
            .ok_or_else(|| BirthdayServiceError::NotFound(id.to_string()))?;

        birthday.name = name;
        if let Some(date) = command.date {
            birthday.date = date;
        }
        if let Some(reminder_type) = command.reminder_type {
            birthday.reminder_type = reminder_type;
        }
        if let Some(repeat_type) = command.repeat_type {
            birthday.repeat_type = repeat_type;
        }
        if let Some(event_type) = command.event_type {
            birthday.event_type = event_type;
        }
        if let Some(show_preference) = command.show_preference {
            birthday.show_preference = show_preference;
        }
        if let Some(show_age) = command.show_age {
            birthday.show_age = show_age;
        }
        birthday.updated_at = self.clock.now();

        // The record may have been deleted since we read it
        if !self.storage.update(&birthday).await? {
            warn!("Birthday disappeared during update: {}", id);
            return Err(BirthdayServiceError::NotFound(id.to_string()));
        }

        info!("Updated birthday: {} with ID: {}", birthday.name, birthday.id);
        self.present(birthday)
    }

    /// Delete a birthday
    pub async fn delete_birthday(&self, id: &str) -> ServiceResult<()> {
        let id = validation::validate_id(id)?;
        info!("Deleting birthday: {}", id);

        if !self.storage.exists_by_id(id).await? {
            warn!("Birthday not found: {}", id);
            return Err(BirthdayServiceError::NotFound(id.to_string()));
        }
        self.storage.delete_by_id(id).await?;

        info!("Deleted birthday: {}", id);
        Ok(())
    }

    /// Case-insensitive substring search on name, in storage order
    pub async fn search_birthdays(&self, term: Option<&str>) -> ServiceResult<Vec<BirthdayView>> {
        let term = validation::validate_search_term(term)?;
        debug!("Searching birthdays for '{}'", term);

        let found = self.storage.search_by_name(&term).await?;
        info!("Search for '{}' matched {} birthdays", term, found.len());

        found.into_iter().map(|b| self.present(b)).collect()
    }

    /// All birthdays, soonest first
    pub async fn list_birthdays(&self) -> ServiceResult<Vec<BirthdayView>> {
        let birthdays = self.storage.find_all().await?;
        info!("Found {} birthdays", birthdays.len());
        self.present_sorted(birthdays)
    }

    /// Birthdays of one event type, soonest first
    pub async fn list_by_event_type(&self, event_type: EventType) -> ServiceResult<Vec<BirthdayView>> {
        let birthdays = self.storage.find_by_event_type(event_type).await?;
        info!("Found {} birthdays with event type {}", birthdays.len(), event_type);
        self.present_sorted(birthdays)
    }

    /// Birthdays whose next occurrence is at most `days` away, soonest first.
    /// A negative window matches nothing.
    pub async fn list_upcoming(&self, days: i64) -> ServiceResult<Vec<BirthdayView>> {
        let mut views = self.present_sorted(self.storage.find_all().await?)?;
        views.retain(|view| view.occurrence.days_until_next <= days);
        info!("Found {} birthdays in the next {} days", views.len(), days);
        Ok(views)
    }

    fn present(&self, birthday: Birthday) -> ServiceResult<BirthdayView> {
        let today = self.clock.today();
        let occurrence = OccurrenceCalculation::calculate(birthday.date, today).ok_or_else(|| {
            error!("Next occurrence of {} is out of calendar range", birthday.id);
            BirthdayServiceError::Unexpected(format!(
                "Cannot compute next occurrence for birthday {}",
                birthday.id
            ))
        })?;
        Ok(BirthdayView { birthday, occurrence })
    }

    fn present_sorted(&self, birthdays: Vec<Birthday>) -> ServiceResult<Vec<BirthdayView>> {
        let mut views = birthdays
            .into_iter()
            .map(|b| self.present(b))
            .collect::<ServiceResult<Vec<_>>>()?;
        // stable, so ties keep storage order
        views.sort_by_key(|view| view.occurrence.days_until_next);
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::validation::ViolationKind;
    use crate::storage::{DbConnection, SqliteBirthdayRepository};
    use chrono::NaiveDate;
    use shared::{ReminderType, RepeatType, ShowPreference};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    async fn setup_test() -> BirthdayService {
        let db = DbConnection::init_in_memory().await.expect("Failed to create test database");
        let storage = Arc::new(SqliteBirthdayRepository::new(db));
        BirthdayService::new(storage, Arc::new(FixedClock::new(today())))
    }

    fn create_command(name: &str, date: (i32, u32, u32), event_type: EventType) -> CreateBirthdayCommand {
        CreateBirthdayCommand {
            name: Some(name.to_string()),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            reminder_type: Some(ReminderType::OneDayBefore),
            repeat_type: Some(RepeatType::Yearly),
            event_type: Some(event_type),
            show_preference: Some(ShowPreference::Public),
            show_age: Some(true),
        }
    }

    #[tokio::test]
    async fn test_create_birthday() {
        let service = setup_test().await;

        let view = service
            .create_birthday(create_command("  Alice ", (2000, 8, 15), EventType::Birthday))
            .await
            .expect("Failed to create birthday");

        assert_eq!(view.birthday.name, "Alice");
        assert!(!view.birthday.id.is_empty());
        assert_eq!(view.birthday.created_at, view.birthday.updated_at);
        assert_eq!(view.occurrence.days_until_next, 60);
        assert_eq!(view.occurrence.age, 24);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_rejected() {
        let service = setup_test().await;
        service
            .create_birthday(create_command("Alice", (2000, 8, 15), EventType::Birthday))
            .await
            .unwrap();

        let err = service
            .create_birthday(create_command(" Alice ", (2000, 8, 15), EventType::Birthday))
            .await
            .unwrap_err();
        match err {
            BirthdayServiceError::Validation(failure) => {
                assert!(failure.has(ViolationKind::DuplicateRecord));
                assert_eq!(failure.summary(), "A birthday with the same name and date already exists");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        // different case is a different name
        assert!(service
            .create_birthday(create_command("alice", (2000, 8, 15), EventType::Birthday))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_future_date_allowed_only_for_non_birthdays() {
        let service = setup_test().await;

        let err = service
            .create_birthday(create_command("Baby", (2025, 7, 1), EventType::Birthday))
            .await
            .unwrap_err();
        assert!(matches!(err, BirthdayServiceError::Validation(ref f) if f.has(ViolationKind::FutureDate)));

        let view = service
            .create_birthday(create_command("Wedding", (2025, 7, 1), EventType::Anniversary))
            .await
            .expect("future anniversary should be accepted");
        assert_eq!(view.occurrence.age, 0);
    }

    #[tokio::test]
    async fn test_get_birthday_round_trip() {
        let service = setup_test().await;
        let created = service
            .create_birthday(create_command("Alice", (2000, 8, 15), EventType::Birthday))
            .await
            .unwrap();

        let fetched = service.get_birthday(&created.birthday.id).await.unwrap();
        assert_eq!(fetched.birthday.name, created.birthday.name);
        assert_eq!(fetched.birthday.date, created.birthday.date);
        assert_eq!(fetched.occurrence, created.occurrence);
    }

    #[tokio::test]
    async fn test_get_nonexistent_birthday() {
        let service = setup_test().await;
        let err = service.get_birthday("missing").await.unwrap_err();
        assert!(matches!(err, BirthdayServiceError::NotFound(ref id) if id == "missing"));
        assert_eq!(err.to_string(), "Birthday not found with id: missing");

        let err = service.get_birthday("  ").await.unwrap_err();
        assert!(matches!(err, BirthdayServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_ids_are_looked_up_as_given() {
        let service = setup_test().await;
        let created = service
            .create_birthday(create_command("Alice", (2000, 8, 15), EventType::Birthday))
            .await
            .unwrap();

        let padded = format!(" {} ", created.birthday.id);
        let err = service.get_birthday(&padded).await.unwrap_err();
        assert!(matches!(err, BirthdayServiceError::NotFound(ref id) if *id == padded));
        assert!(service.get_birthday(&created.birthday.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_birthday_changes_only_supplied_fields() {
        let service = setup_test().await;
        let created = service
            .create_birthday(create_command("Alice", (2000, 8, 15), EventType::Birthday))
            .await
            .unwrap();

        let updated = service
            .update_birthday(
                &created.birthday.id,
                UpdateBirthdayCommand {
                    name: Some(" Alicia ".to_string()),
                    show_age: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.birthday.id, created.birthday.id);
        assert_eq!(updated.birthday.name, "Alicia");
        assert!(!updated.birthday.show_age);
        assert_eq!(updated.birthday.date, created.birthday.date);
        assert_eq!(updated.birthday.reminder_type, ReminderType::OneDayBefore);
        assert_eq!(updated.birthday.created_at, created.birthday.created_at);
        assert!(updated.birthday.updated_at >= created.birthday.updated_at);

        let fetched = service.get_birthday(&created.birthday.id).await.unwrap();
        assert_eq!(fetched.birthday.name, "Alicia");
    }

    #[tokio::test]
    async fn test_update_requires_name() {
        let service = setup_test().await;
        let created = service
            .create_birthday(create_command("Alice", (2000, 8, 15), EventType::Birthday))
            .await
            .unwrap();

        let err = service
            .update_birthday(&created.birthday.id, UpdateBirthdayCommand::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BirthdayServiceError::Validation(ref f) if f.has(ViolationKind::EmptyField)));
    }

    #[tokio::test]
    async fn test_update_nonexistent_birthday() {
        let service = setup_test().await;
        let err = service
            .update_birthday(
                "missing",
                UpdateBirthdayCommand {
                    name: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BirthdayServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_birthday() {
        let service = setup_test().await;
        let created = service
            .create_birthday(create_command("Alice", (2000, 8, 15), EventType::Birthday))
            .await
            .unwrap();

        service.delete_birthday(&created.birthday.id).await.unwrap();
        let err = service.get_birthday(&created.birthday.id).await.unwrap_err();
        assert!(matches!(err, BirthdayServiceError::NotFound(_)));

        let err = service.delete_birthday(&created.birthday.id).await.unwrap_err();
        assert!(matches!(err, BirthdayServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_birthdays_sorted_by_next_occurrence() {
        let service = setup_test().await;
        service.create_birthday(create_command("June", (2000, 6, 10), EventType::Birthday)).await.unwrap();
        service.create_birthday(create_command("August", (2000, 8, 15), EventType::Birthday)).await.unwrap();
        service.create_birthday(create_command("Today", (1990, 6, 15), EventType::Birthday)).await.unwrap();

        let names: Vec<String> = service
            .list_birthdays()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.birthday.name)
            .collect();
        assert_eq!(names, vec!["Today", "August", "June"]);
    }

    #[tokio::test]
    async fn test_list_by_event_type() {
        let service = setup_test().await;
        service.create_birthday(create_command("Alice", (2000, 8, 15), EventType::Birthday)).await.unwrap();
        service.create_birthday(create_command("Wedding", (2010, 7, 1), EventType::Anniversary)).await.unwrap();
        service.create_birthday(create_command("Dating", (2012, 6, 20), EventType::Anniversary)).await.unwrap();

        let names: Vec<String> = service
            .list_by_event_type(EventType::Anniversary)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.birthday.name)
            .collect();
        assert_eq!(names, vec!["Dating", "Wedding"]);
        assert!(service.list_by_event_type(EventType::Holiday).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_upcoming() {
        let service = setup_test().await;
        service.create_birthday(create_command("Today", (1990, 6, 15), EventType::Birthday)).await.unwrap();
        service.create_birthday(create_command("Soon", (1990, 6, 20), EventType::Birthday)).await.unwrap();
        service.create_birthday(create_command("Later", (2000, 8, 15), EventType::Birthday)).await.unwrap();

        let names = |views: Vec<BirthdayView>| views.into_iter().map(|v| v.birthday.name).collect::<Vec<_>>();

        assert_eq!(names(service.list_upcoming(0).await.unwrap()), vec!["Today"]);
        assert_eq!(names(service.list_upcoming(5).await.unwrap()), vec!["Today", "Soon"]);
        assert_eq!(names(service.list_upcoming(60).await.unwrap()), vec!["Today", "Soon", "Later"]);
        assert!(service.list_upcoming(-1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_birthdays() {
        let service = setup_test().await;
        service.create_birthday(create_command("Alice Smith", (2000, 8, 15), EventType::Birthday)).await.unwrap();
        service.create_birthday(create_command("Bob", (1990, 1, 1), EventType::Birthday)).await.unwrap();

        let found = service.search_birthdays(Some(" smith ")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].birthday.name, "Alice Smith");

        assert!(service.search_birthdays(Some("nobody")).await.unwrap().is_empty());

        service.create_birthday(create_command("ÉLODIE", (1995, 3, 3), EventType::Birthday)).await.unwrap();
        let found = service.search_birthdays(Some("élodie")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].birthday.name, "ÉLODIE");

        let err = service.search_birthdays(Some("   ")).await.unwrap_err();
        assert!(matches!(err, BirthdayServiceError::Validation(_)));
        let err = service.search_birthdays(None).await.unwrap_err();
        assert!(matches!(err, BirthdayServiceError::Validation(_)));
    }
}
