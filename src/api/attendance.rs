use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AdminUser;
use crate::auth::password::verify_secret;
use crate::config::Config;
use crate::external::geocode::Geocoder;
use crate::model::attendance::{AttendanceRecord, PunchWithEmployee};
use crate::store::{self, StoreError, attendance::NewPunch};
use crate::utils::punch_filter;

#[derive(Deserialize, ToSchema)]
pub struct PunchRequest {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "4321")]
    pub pin: String,

    #[schema(example = 21.1702, nullable = true)]
    pub latitude: Option<f64>,

    #[schema(example = 72.8311, nullable = true)]
    pub longitude: Option<f64>,

    /// Opaque captured-photo reference (data URL or upload key)
    #[schema(nullable = true)]
    pub photo: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BoardQuery {
    /// Defaults to today
    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub from: NaiveDate,

    #[schema(example = "2024-02-04", value_type = String, format = "date")]
    pub to: NaiveDate,
}

/// Daily punch-in: the single attendance-marking action by an employee.
#[utoipa::path(
    post,
    path = "/punch",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Attendance marked", body = Object, example = json!({
            "message": "Attendance marked",
            "status": "Present"
        })),
        (status = 400, description = "Already marked today", body = Object, example = json!({
            "message": "Already marked today"
        })),
        (status = 401, description = "Invalid PIN"),
        (status = 404, description = "Employee not found"),
        (status = 503, description = "Attendance store unavailable")
    ),
    tag = "Attendance"
)]
pub async fn punch_in(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    geocoder: web::Data<Geocoder>,
    payload: web::Json<PunchRequest>,
) -> actix_web::Result<impl Responder> {
    let employee = match store::employee::fetch(pool.get_ref(), payload.employee_id).await {
        Ok(Some(e)) => e,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Employee not found"
            })));
        }
        Err(e) => {
            error!(error = %e, employee_id = payload.employee_id, "Punch-in: employee lookup failed");
            return Ok(store_unavailable());
        }
    };

    if verify_secret(&payload.pin, &employee.pin_hash).is_err() {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "message": "Invalid PIN"
        })));
    }

    if config.punch_require_location
        && (payload.latitude.is_none() || payload.longitude.is_none())
    {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Location is required to mark attendance"
        })));
    }

    let now = Local::now();
    let date = now.date_naive();
    let time_in = now.time();

    // Fast-negative pre-check; the unique key in the store stays the
    // authority under concurrent punches.
    if punch_filter::might_exist(employee.id, date) {
        match store::attendance::exists_for_day(pool.get_ref(), employee.id, date).await {
            Ok(true) => {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "message": "Already marked today"
                })));
            }
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, employee_id = employee.id, "Punch-in: duplicate check failed");
                return Ok(store_unavailable());
            }
        }
    }

    let address = match (payload.latitude, payload.longitude) {
        (Some(lat), Some(lon)) => Some(geocoder.resolve(lat, lon).await),
        _ => None,
    };

    let status = config.payroll_policy().classify_punch(time_in);
    let status_label = status.to_string();

    let punch = NewPunch {
        employee_id: employee.id,
        date,
        time_in,
        status: &status_label,
        photo: payload.photo.as_deref(),
        latitude: payload.latitude,
        longitude: payload.longitude,
        address: address.as_deref(),
    };

    match store::attendance::mark(pool.get_ref(), punch).await {
        Ok(()) => {
            punch_filter::insert(employee.id, date);

            Ok(HttpResponse::Ok().json(json!({
                "message": "Attendance marked",
                "date": date,
                "time_in": time_in.format("%H:%M:%S").to_string(),
                "status": status_label,
                "address": address
            })))
        }
        Err(StoreError::AlreadyMarked) => Ok(HttpResponse::BadRequest().json(json!({
            "message": "Already marked today"
        }))),
        Err(e) => {
            error!(error = %e, employee_id = employee.id, "Punch-in failed");
            Ok(store_unavailable())
        }
    }
}

/// Live board: everyone who has punched on the given day.
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    params(BoardQuery),
    responses(
        (status = 200, description = "Punches for the day", body = Vec<PunchWithEmployee>),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Attendance store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn today_board(
    _admin: AdminUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<BoardQuery>,
) -> actix_web::Result<impl Responder> {
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());

    match store::attendance::on_date(pool.get_ref(), date).await {
        Ok(rows) => Ok(HttpResponse::Ok().json(rows)),
        Err(e) => {
            error!(error = %e, %date, "Failed to fetch live board");
            Ok(store_unavailable())
        }
    }
}

/// Per-employee attendance history over a date range.
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Attendance records", body = Vec<AttendanceRecord>),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Attendance store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn attendance_history(
    _admin: AdminUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HistoryQuery>,
) -> actix_web::Result<impl Responder> {
    match store::attendance::in_range(pool.get_ref(), query.employee_id, query.from, query.to).await
    {
        Ok(rows) => Ok(HttpResponse::Ok().json(rows)),
        Err(e) => {
            error!(error = %e, employee_id = query.employee_id, "Failed to fetch attendance history");
            Ok(store_unavailable())
        }
    }
}

pub(super) fn store_unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(json!({
        "message": "Attendance store unavailable"
    }))
}
