/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Stock and adjustment quantities are PostgreSQL INTEGER.
pub type Quantity = i32;

/// Largest price a `NUMERIC(10,2)` price column can hold.
pub const MAX_PRICE: f64 = 99_999_999.99;
