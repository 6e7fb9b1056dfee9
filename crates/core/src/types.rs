/// Mirrored ids are the upstream system's BIGINT primary keys.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates carried by payroll payloads (holidays, pay periods, hire dates).
pub type Date = chrono::NaiveDate;
