use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite};
use shared::EventType;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use super::connection::DbConnection;
use crate::domain::models::birthday::{Birthday, NewBirthday};
use crate::storage::traits::{BirthdayStorage, StorageError, StorageResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, date, reminder_type, repeat_type, event_type,
           show_preference, show_age, created_at, updated_at
    FROM birthdays
"#;

/// Repository for birthday records
#[derive(Clone)]
pub struct SqliteBirthdayRepository {
    db: DbConnection,
}

impl SqliteBirthdayRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn fetch_many<'q>(&self, query: Query<'q, Sqlite, SqliteArguments<'q>>) -> StorageResult<Vec<Birthday>> {
        let rows = query.fetch_all(self.db.pool()).await?;
        rows.iter().map(row_to_birthday).collect()
    }
}

fn corrupt(id: &str, reason: impl Into<String>) -> StorageError {
    StorageError::CorruptRecord {
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn parse_column<T: FromStr>(id: &str, column: &str, raw: &str) -> StorageResult<T> {
    raw.parse()
        .map_err(|_| corrupt(id, format!("invalid {} '{}'", column, raw)))
}

fn parse_timestamp(id: &str, column: &str, raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| corrupt(id, format!("invalid {} '{}'", column, raw)))
}

fn row_to_birthday(row: &SqliteRow) -> StorageResult<Birthday> {
    let id: String = row.try_get("id")?;
    let date: String = row.try_get("date")?;
    let reminder_type: String = row.try_get("reminder_type")?;
    let repeat_type: String = row.try_get("repeat_type")?;
    let event_type: String = row.try_get("event_type")?;
    let show_preference: String = row.try_get("show_preference")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Birthday {
        name: row.try_get("name")?,
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .map_err(|_| corrupt(&id, format!("invalid date '{}'", date)))?,
        reminder_type: parse_column(&id, "reminder_type", &reminder_type)?,
        repeat_type: parse_column(&id, "repeat_type", &repeat_type)?,
        event_type: parse_column(&id, "event_type", &event_type)?,
        show_preference: parse_column(&id, "show_preference", &show_preference)?,
        show_age: row.try_get("show_age")?,
        created_at: parse_timestamp(&id, "created_at", &created_at)?,
        updated_at: parse_timestamp(&id, "updated_at", &updated_at)?,
        id,
    })
}

#[async_trait]
impl BirthdayStorage for SqliteBirthdayRepository {
    async fn insert(&self, new: NewBirthday) -> StorageResult<Birthday> {
        let birthday = Birthday::from_new(Uuid::new_v4().to_string(), new);

        sqlx::query(
            r#"
            INSERT INTO birthdays (id, name, date, reminder_type, repeat_type, event_type,
                                   show_preference, show_age, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&birthday.id)
        .bind(&birthday.name)
        .bind(birthday.date.format(DATE_FORMAT).to_string())
        .bind(birthday.reminder_type.as_str())
        .bind(birthday.repeat_type.as_str())
        .bind(birthday.event_type.as_str())
        .bind(birthday.show_preference.as_str())
        .bind(birthday.show_age)
        .bind(birthday.created_at.to_rfc3339())
        .bind(birthday.updated_at.to_rfc3339())
        .execute(self.db.pool())
        .await?;

        debug!("Inserted birthday {}", birthday.id);
        Ok(birthday)
    }

    async fn find_by_id(&self, id: &str) -> StorageResult<Option<Birthday>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_birthday).transpose()
    }

    async fn find_by_name_and_date(&self, name: &str, date: NaiveDate) -> StorageResult<Option<Birthday>> {
        let row = sqlx::query(&format!("{} WHERE name = ? AND date = ? LIMIT 1", SELECT_COLUMNS))
            .bind(name)
            .bind(date.format(DATE_FORMAT).to_string())
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_birthday).transpose()
    }

    async fn find_by_event_type(&self, event_type: EventType) -> StorageResult<Vec<Birthday>> {
        let sql = format!("{} WHERE event_type = ?", SELECT_COLUMNS);
        self.fetch_many(sqlx::query(&sql).bind(event_type.as_str())).await
    }

    async fn search_by_name(&self, fragment: &str) -> StorageResult<Vec<Birthday>> {
        // SQLite's lower() only folds ASCII, so matching happens here
        let needle = fragment.to_lowercase();
        let all = self.fetch_many(sqlx::query(SELECT_COLUMNS)).await?;
        Ok(all
            .into_iter()
            .filter(|birthday| birthday.name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn find_all(&self) -> StorageResult<Vec<Birthday>> {
        self.fetch_many(sqlx::query(SELECT_COLUMNS)).await
    }

    async fn update(&self, birthday: &Birthday) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE birthdays
            SET name = ?, date = ?, reminder_type = ?, repeat_type = ?, event_type = ?,
                show_preference = ?, show_age = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&birthday.name)
        .bind(birthday.date.format(DATE_FORMAT).to_string())
        .bind(birthday.reminder_type.as_str())
        .bind(birthday.repeat_type.as_str())
        .bind(birthday.event_type.as_str())
        .bind(birthday.show_preference.as_str())
        .bind(birthday.show_age)
        .bind(birthday.updated_at.to_rfc3339())
        .bind(&birthday.id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: &str) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM birthdays WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_id(&self, id: &str) -> StorageResult<bool> {
        let row = sqlx::query("SELECT 1 FROM birthdays WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT COUNT(*) FROM birthdays")
            .fetch_one(self.db.pool())
            .await?;
        Ok(())
    }

    fn database_name(&self) -> String {
        self.db.database_name().to_string()
    }
}
