//! backend/src/io/rest/mappers/birthday_mapper.rs

use crate::domain::commands::birthday::{CreateBirthdayCommand, UpdateBirthdayCommand};
use crate::domain::models::birthday::BirthdayView;
use crate::domain::validation::{parse_date, ValidationFailure};
use shared::{Birthday as SharedBirthday, CreateBirthdayRequest, UpdateBirthdayRequest};

/// Mapper between the shared birthday DTOs and domain types.
pub struct BirthdayMapper;

impl BirthdayMapper {
    /// Converts a domain view to the shared DTO, carrying the computed fields.
    pub fn to_dto(view: BirthdayView) -> SharedBirthday {
        let BirthdayView { birthday, occurrence } = view;
        SharedBirthday {
            id: birthday.id,
            name: birthday.name,
            date: birthday.date.format("%Y-%m-%d").to_string(),
            reminder_type: birthday.reminder_type,
            repeat_type: birthday.repeat_type,
            event_type: birthday.event_type,
            show_preference: birthday.show_preference,
            show_age: birthday.show_age,
            created_at: birthday.created_at.to_rfc3339(),
            updated_at: birthday.updated_at.to_rfc3339(),
            days_until_next: occurrence.days_until_next,
            age: occurrence.age,
        }
    }

    pub fn to_dto_list(views: Vec<BirthdayView>) -> Vec<SharedBirthday> {
        views.into_iter().map(Self::to_dto).collect()
    }

    /// Converts a create request to a domain command. Only the date format is
    /// checked here; every other rule runs in the domain.
    pub fn to_create_command(request: CreateBirthdayRequest) -> Result<CreateBirthdayCommand, ValidationFailure> {
        let date = request.date.as_deref().map(parse_date).transpose()?;
        Ok(CreateBirthdayCommand {
            name: request.name,
            date,
            reminder_type: request.reminder_type,
            repeat_type: request.repeat_type,
            event_type: request.event_type,
            show_preference: request.show_preference,
            show_age: request.show_age,
        })
    }

    pub fn to_update_command(request: UpdateBirthdayRequest) -> Result<UpdateBirthdayCommand, ValidationFailure> {
        let date = request.date.as_deref().map(parse_date).transpose()?;
        Ok(UpdateBirthdayCommand {
            name: request.name,
            date,
            reminder_type: request.reminder_type,
            repeat_type: request.repeat_type,
            event_type: request.event_type,
            show_preference: request.show_preference,
            show_age: request.show_age,
        })
    }
}
