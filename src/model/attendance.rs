use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

/// Status recorded at punch time. `Absent` is never stored; it is synthesized
/// by the payroll engine for days with no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
pub enum AttendanceStatus {
    #[strum(serialize = "Present")]
    Present,
    #[strum(serialize = "Half Day")]
    HalfDay,
    #[strum(serialize = "Absent")]
    Absent,
}

/// One row per (employee, date), enforced by a unique key in the store.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "09:12:40", value_type = String)]
    pub time_in: NaiveTime,

    #[schema(example = "Present")]
    pub status: String,

    #[schema(nullable = true)]
    pub photo: Option<String>,

    #[schema(example = 21.1702, nullable = true)]
    pub latitude: Option<f64>,

    #[schema(example = 72.8311, nullable = true)]
    pub longitude: Option<f64>,

    #[schema(example = "Ring Road, Surat, Gujarat, India", nullable = true)]
    pub address: Option<String>,
}

/// Attendance row joined with the employee, for the admin live board.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct PunchWithEmployee {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "Ramesh Patel")]
    pub name: String,

    #[schema(example = "Technician")]
    pub designation: String,

    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "09:12:40", value_type = String)]
    pub time_in: NaiveTime,

    #[schema(example = "Present")]
    pub status: String,

    #[schema(example = "Ring Road, Surat, Gujarat, India", nullable = true)]
    pub address: Option<String>,
}
