use std::collections::BTreeMap;

use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::api::attendance::store_unavailable;
use crate::auth::auth::AdminUser;
use crate::config::Config;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::payroll::{DailyLedgerEntry, DayRecord, PayCycle, PayrollStatement, reconcile, report};
use crate::store;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1001)]
    pub employee_id: u64,

    /// Month the pay cycle ends in (1-12)
    #[schema(example = 2)]
    pub month: u32,

    #[schema(example = 2024)]
    pub year: i32,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollResponse {
    #[schema(example = 1001)]
    pub employee_id: u64,

    #[schema(example = "Ramesh Patel")]
    pub name: String,

    #[schema(example = "Technician")]
    pub designation: String,

    #[schema(example = 30000.0)]
    pub base_salary: f64,

    #[schema(example = "2024-01-05", value_type = String, format = "date")]
    pub cycle_start: NaiveDate,

    #[schema(example = "2024-02-04", value_type = String, format = "date")]
    pub cycle_end: NaiveDate,

    #[schema(example = 7.0)]
    pub payable_days: f64,

    #[schema(example = 7000.0)]
    pub total_pay: f64,

    pub ledger: Vec<DailyLedgerEntry>,
}

impl PayrollResponse {
    fn new(employee: &Employee, statement: PayrollStatement) -> Self {
        PayrollResponse {
            employee_id: employee.id,
            name: employee.name.clone(),
            designation: employee.designation.clone(),
            base_salary: employee.salary,
            cycle_start: statement.cycle_start,
            cycle_end: statement.cycle_end,
            payable_days: statement.payable_days,
            total_pay: statement.total_pay,
            ledger: statement.ledger,
        }
    }
}

/// Re-keys the fetched rows by date for the engine. Stored statuses were
/// written by this service, so an unparseable one falls back to Present.
fn build_record_map(rows: Vec<AttendanceRecord>) -> BTreeMap<NaiveDate, DayRecord> {
    rows.into_iter()
        .map(|row| {
            let status = row.status.parse().unwrap_or(AttendanceStatus::Present);
            (
                row.date,
                DayRecord {
                    status,
                    time_in: row.time_in,
                    address: row.address,
                },
            )
        })
        .collect()
}

enum PayrollRun {
    Computed(Box<(Employee, PayrollStatement)>),
    Rejected(HttpResponse),
}

/// Shared by the JSON and sheet endpoints: derive the cycle, fetch the
/// records, run the engine. A store failure aborts the run; it is never
/// reported as zero attendance.
async fn run_payroll(pool: &MySqlPool, config: &Config, query: &PayrollQuery) -> PayrollRun {
    let policy = config.payroll_policy();

    let Some(cycle) = PayCycle::for_reference(query.month, query.year, policy.cycle_boundary)
    else {
        return PayrollRun::Rejected(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "month must be between 1 and 12"
        })));
    };

    let employee = match store::employee::fetch(pool, query.employee_id).await {
        Ok(Some(e)) => e,
        Ok(None) => {
            return PayrollRun::Rejected(HttpResponse::NotFound().json(serde_json::json!({
                "message": "Employee not found"
            })));
        }
        Err(e) => {
            error!(error = %e, employee_id = query.employee_id, "Payroll: employee lookup failed");
            return PayrollRun::Rejected(store_unavailable());
        }
    };

    let rows = match store::attendance::in_range(pool, employee.id, cycle.start, cycle.end).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, employee_id = employee.id, "Payroll: attendance fetch failed");
            return PayrollRun::Rejected(store_unavailable());
        }
    };

    let records = build_record_map(rows);
    let statement = reconcile(employee.salary, &cycle, &records, &policy);

    PayrollRun::Computed(Box::new((employee, statement)))
}

/// Reconciles one employee's attendance into the pay statement for a cycle.
#[utoipa::path(
    get,
    path = "/api/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, description = "Payroll statement", body = PayrollResponse),
        (status = 400, description = "Invalid reference month"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found"),
        (status = 503, description = "Attendance store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn compute_payroll(
    _admin: AdminUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    match run_payroll(pool.get_ref(), config.get_ref(), &query).await {
        PayrollRun::Computed(run) => {
            let (employee, statement) = *run;
            Ok(HttpResponse::Ok().json(PayrollResponse::new(&employee, statement)))
        }
        PayrollRun::Rejected(resp) => Ok(resp),
    }
}

/// Same reconciliation, rendered as the downloadable payroll sheet.
#[utoipa::path(
    get,
    path = "/api/payroll/sheet",
    params(PayrollQuery),
    responses(
        (status = 200, description = "CSV payroll sheet", body = String, content_type = "text/csv"),
        (status = 400, description = "Invalid reference month"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found"),
        (status = 503, description = "Attendance store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn payroll_sheet(
    _admin: AdminUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    match run_payroll(pool.get_ref(), config.get_ref(), &query).await {
        PayrollRun::Computed(run) => {
            let (employee, statement) = *run;
            let sheet = report::render_sheet(&statement);
            let filename = format!(
                "payroll_{}_{}-{:02}.csv",
                employee.id, query.year, query.month
            );

            Ok(HttpResponse::Ok()
                .content_type("text/csv")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(sheet))
        }
        PayrollRun::Rejected(resp) => Ok(resp),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn row(date: NaiveDate, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            employee_id: 1001,
            date,
            time_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            status: status.to_string(),
            photo: None,
            latitude: None,
            longitude: None,
            address: None,
        }
    }

    #[test]
    fn record_map_is_keyed_by_date_with_parsed_status() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let map = build_record_map(vec![row(date, "Half Day")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&date].status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn unknown_stored_status_falls_back_to_present() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let map = build_record_map(vec![row(date, "???")]);
        assert_eq!(map[&date].status, AttendanceStatus::Present);
    }
}
