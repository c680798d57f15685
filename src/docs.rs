use crate::api::admin::{LoginRequest, LoginResponse, ResetConfirmRequest};
use crate::api::attendance::{BoardQuery, HistoryQuery, PunchRequest};
use crate::api::employee::{
    CreateEmployee, EmployeeListResponse, EmployeeQuery, EmployeeResponse, UpdateEmployee,
};
use crate::api::payroll::{PayrollQuery, PayrollResponse};
use crate::model::attendance::{AttendanceRecord, PunchWithEmployee};
use crate::payroll::engine::{DailyLedgerEntry, PayrollStatement};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance & Payroll Portal API",
        version = "1.0.0",
        description = r#"
## Attendance & Payroll Portal

Staff record a daily presence event (PIN + optional geolocation and photo);
administrators review live attendance and reconcile it into periodic pay.

### Key Features
- **Punch-in**
  - One attendance record per employee per day, PIN-authenticated
  - Optional geolocation with reverse-geocoded address
- **Live Attendance**
  - Today's punches across the whole staff
- **Payroll Reconciliation**
  - Deterministic per-day ledger over a monthly pay cycle
  - Weekly-off and half-day policy, downloadable CSV sheet
- **Employee Management**
  - Create, update, list, and delete employee profiles

### Security
Administrative endpoints use **JWT Bearer authentication** obtained from the
shared admin credential. Punch-in authenticates with the employee PIN.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::punch_in,
        crate::api::attendance::today_board,
        crate::api::attendance::attendance_history,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::payroll::compute_payroll,
        crate::api::payroll::payroll_sheet,

        crate::api::admin::login,
        crate::api::admin::reset_request,
        crate::api::admin::reset_confirm
    ),
    components(
        schemas(
            PunchRequest,
            BoardQuery,
            HistoryQuery,
            AttendanceRecord,
            PunchWithEmployee,
            CreateEmployee,
            UpdateEmployee,
            EmployeeResponse,
            EmployeeQuery,
            EmployeeListResponse,
            PayrollQuery,
            PayrollResponse,
            PayrollStatement,
            DailyLedgerEntry,
            LoginRequest,
            LoginResponse,
            ResetConfirmRequest
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Punch-in and attendance views"),
        (name = "Payroll", description = "Pay-cycle reconciliation APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Auth", description = "Admin login and password reset"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
