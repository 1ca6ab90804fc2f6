use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "today" and "now" for the domain layer
pub trait Clock: Send + Sync {
    /// The current calendar date
    fn today(&self) -> NaiveDate;

    /// The current instant, used for record timestamps
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time; "today" is the local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a given day, for tests and reproducible runs.
///
/// `now()` still advances so that consecutive writes get increasing
/// timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
