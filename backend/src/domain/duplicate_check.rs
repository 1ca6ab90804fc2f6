use chrono::NaiveDate;
use tracing::warn;

use crate::domain::birthday_service::BirthdayServiceError;
use crate::domain::validation::Violation;
use crate::storage::BirthdayStorage;

/// Reject a new record whose trimmed name and date match one already stored.
///
/// The name comparison is exact and case-sensitive. Uniqueness is checked
/// here rather than by a storage constraint, so two concurrent creates can
/// still both succeed.
pub async fn ensure_not_duplicate(
    storage: &dyn BirthdayStorage,
    name: &str,
    date: NaiveDate,
) -> Result<(), BirthdayServiceError> {
    if let Some(existing) = storage.find_by_name_and_date(name.trim(), date).await? {
        warn!("Duplicate birthday rejected: '{}' on {} matches {}", name, date, existing.id);
        return Err(Violation::duplicate().into());
    }
    Ok(())
}
