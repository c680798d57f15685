use chrono::{NaiveDate, NaiveTime};
use sqlx::MySqlPool;

use super::StoreError;
use crate::model::attendance::{AttendanceRecord, PunchWithEmployee};

pub struct NewPunch<'a> {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub time_in: NaiveTime,
    pub status: &'a str,
    pub photo: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<&'a str>,
}

/// Insert-if-absent. The UNIQUE(employee_id, date) key is the only
/// concurrency-safety mechanism: a losing concurrent punch surfaces as
/// `AlreadyMarked` instead of a duplicate row.
pub async fn mark(pool: &MySqlPool, punch: NewPunch<'_>) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO attendance
        (employee_id, date, time_in, status, photo, latitude, longitude, address)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(punch.employee_id)
    .bind(punch.date)
    .bind(punch.time_in)
    .bind(punch.status)
    .bind(punch.photo)
    .bind(punch.latitude)
    .bind(punch.longitude)
    .bind(punch.address)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn exists_for_day(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<bool, StoreError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM attendance WHERE employee_id = ? AND date = ? LIMIT 1)",
    )
    .bind(employee_id)
    .bind(date)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// All records for one employee whose date falls in `[start, end]`. Order is
/// not guaranteed; the payroll engine re-keys the rows into a map.
pub async fn in_range(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<AttendanceRecord>, StoreError> {
    let rows = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, employee_id, date, time_in, status, photo, latitude, longitude, address
        FROM attendance
        WHERE employee_id = ? AND date BETWEEN ? AND ?
        "#,
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Live board: everyone who punched on the given day, with names.
pub async fn on_date(
    pool: &MySqlPool,
    date: NaiveDate,
) -> Result<Vec<PunchWithEmployee>, StoreError> {
    let rows = sqlx::query_as::<_, PunchWithEmployee>(
        r#"
        SELECT a.employee_id, e.name, e.designation, a.date, a.time_in, a.status, a.address
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE a.date = ?
        ORDER BY a.time_in
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
