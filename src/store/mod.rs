use derive_more::Display;

pub mod admin;
pub mod attendance;
pub mod employee;

/// Failures surfaced by the record store. `Unavailable` must never be
/// collapsed into an empty result set: a payroll run over a broken connection
/// is aborted, not computed as zero attendance.
#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "already marked for this day")]
    AlreadyMarked,
    #[display(fmt = "record not found")]
    NotFound,
    #[display(fmt = "store unavailable: {}", _0)]
    Unavailable(sqlx::Error),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            // MySQL duplicate-key violations report SQLSTATE 23000
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000") => {
                StoreError::AlreadyMarked
            }
            _ => StoreError::Unavailable(e),
        }
    }
}
