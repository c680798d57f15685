use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::api::attendance::store_unavailable;
use crate::auth::auth::AdminUser;
use crate::auth::password::hash_secret;
use crate::model::employee::Employee;
use crate::store::{self, employee::EmployeeChanges, employee::NewEmployee};
use crate::utils::punch_filter;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Ramesh Patel")]
    pub name: String,

    #[schema(example = "Technician")]
    pub designation: String,

    #[schema(example = 30000.0)]
    pub salary: f64,

    /// Short numeric PIN used for punch-in (4-6 digits)
    #[schema(example = "4321")]
    pub pin: String,

    #[schema(nullable = true)]
    pub photo: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub designation: Option<String>,
    #[schema(example = 32000.0)]
    pub salary: Option<f64>,
    #[schema(example = "5678")]
    pub pin: Option<String>,
    pub photo: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeResponse {
    #[schema(example = 1001)]
    pub id: u64,

    #[schema(example = "Ramesh Patel")]
    pub name: String,

    #[schema(example = "Technician")]
    pub designation: String,

    #[schema(example = 30000.0)]
    pub salary: f64,

    #[schema(nullable = true)]
    pub photo: Option<String>,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        EmployeeResponse {
            id: e.id,
            name: e.name,
            designation: e.designation,
            salary: e.salary,
            photo: e.photo,
        }
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 20)]
    pub per_page: Option<u32>,

    /// Search by name or designation
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

fn validate_pin(pin: &str) -> bool {
    (4..=6).contains(&pin.len()) && pin.chars().all(|c| c.is_ascii_digit())
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "message": "Employee created",
            "id": 1001
        })),
        (status = 400, description = "Invalid PIN or salary"),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    _admin: AdminUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    if payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Name must not be empty"
        })));
    }
    if !validate_pin(&payload.pin) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "PIN must be 4-6 digits"
        })));
    }
    if payload.salary < 0.0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Salary must not be negative"
        })));
    }

    let pin_hash = hash_secret(&payload.pin);
    let new_employee = NewEmployee {
        name: payload.name.trim(),
        designation: &payload.designation,
        salary: payload.salary,
        pin_hash: &pin_hash,
        photo: payload.photo.as_deref(),
    };

    match store::employee::create(pool.get_ref(), new_employee).await {
        Ok(id) => Ok(HttpResponse::Created().json(json!({
            "message": "Employee created",
            "id": id
        }))),
        Err(e) => {
            error!(error = %e, "Failed to create employee");
            Ok(store_unavailable())
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    _admin: AdminUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    match store::employee::list(pool.get_ref(), page, per_page, query.search.as_deref()).await {
        Ok((employees, total)) => Ok(HttpResponse::Ok().json(EmployeeListResponse {
            data: employees.into_iter().map(EmployeeResponse::from).collect(),
            page,
            per_page,
            total,
        })),
        Err(e) => {
            error!(error = %e, "Failed to list employees");
            Ok(store_unavailable())
        }
    }
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found"),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    _admin: AdminUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    match store::employee::fetch(pool.get_ref(), employee_id).await {
        Ok(Some(employee)) => Ok(HttpResponse::Ok().json(EmployeeResponse::from(employee))),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
        Err(e) => {
            error!(error = %e, employee_id, "Failed to fetch employee");
            Ok(store_unavailable())
        }
    }
}

/// Update Employee (name, designation, salary, PIN, photo)
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated"),
        (status = 400, description = "Invalid PIN or salary"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found"),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    _admin: AdminUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    if let Some(pin) = &body.pin {
        if !validate_pin(pin) {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "PIN must be 4-6 digits"
            })));
        }
    }
    if let Some(salary) = body.salary {
        if salary < 0.0 {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Salary must not be negative"
            })));
        }
    }

    let current = match store::employee::fetch(pool.get_ref(), employee_id).await {
        Ok(Some(e)) => e,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(json!({
                "message": "Employee not found"
            })));
        }
        Err(e) => {
            error!(error = %e, employee_id, "Failed to fetch employee for update");
            return Ok(store_unavailable());
        }
    };

    let changes = EmployeeChanges {
        name: body.name.clone().unwrap_or(current.name),
        designation: body.designation.clone().unwrap_or(current.designation),
        salary: body.salary.unwrap_or(current.salary),
        pin_hash: body
            .pin
            .as_deref()
            .map(hash_secret)
            .unwrap_or(current.pin_hash),
        photo: body.photo.clone().or(current.photo),
    };

    match store::employee::update(pool.get_ref(), employee_id, changes).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({
            "message": "Employee updated"
        }))),
        Err(e) => {
            error!(error = %e, employee_id, "Failed to update employee");
            Ok(store_unavailable())
        }
    }
}

/// Delete Employee (attendance rows are removed first; no FK cascade assumed)
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Employee not found"),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    _admin: AdminUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    match store::employee::delete(pool.get_ref(), employee_id).await {
        Ok(0) => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
        Ok(_) => {
            punch_filter::remove(employee_id, Local::now().date_naive());

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }
        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");
            Ok(store_unavailable())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_must_be_short_and_numeric() {
        assert!(validate_pin("4321"));
        assert!(validate_pin("123456"));
        assert!(!validate_pin("123"));
        assert!(!validate_pin("1234567"));
        assert!(!validate_pin("12a4"));
        assert!(!validate_pin(""));
    }
}
