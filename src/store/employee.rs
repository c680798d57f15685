use sqlx::MySqlPool;

use super::StoreError;
use crate::model::employee::Employee;

pub struct NewEmployee<'a> {
    pub name: &'a str,
    pub designation: &'a str,
    pub salary: f64,
    pub pin_hash: &'a str,
    pub photo: Option<&'a str>,
}

/// Replacement values for an update; the handler merges these over the
/// current row so the statement always writes every column.
pub struct EmployeeChanges {
    pub name: String,
    pub designation: String,
    pub salary: f64,
    pub pin_hash: String,
    pub photo: Option<String>,
}

pub async fn create(pool: &MySqlPool, employee: NewEmployee<'_>) -> Result<u64, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO employees (name, designation, salary, pin_hash, photo)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee.name)
    .bind(employee.designation)
    .bind(employee.salary)
    .bind(employee.pin_hash)
    .bind(employee.photo)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn fetch(pool: &MySqlPool, id: u64) -> Result<Option<Employee>, StoreError> {
    let employee = sqlx::query_as::<_, Employee>(
        "SELECT id, name, designation, salary, pin_hash, photo FROM employees WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(employee)
}

pub async fn list(
    pool: &MySqlPool,
    page: u32,
    per_page: u32,
    search: Option<&str>,
) -> Result<(Vec<Employee>, i64), StoreError> {
    let offset = (page - 1) * per_page;
    let like = search.map(|s| format!("%{}%", s));

    let (total, employees) = match &like {
        Some(like) => {
            let total = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM employees WHERE name LIKE ? OR designation LIKE ?",
            )
            .bind(like)
            .bind(like)
            .fetch_one(pool)
            .await?;

            let employees = sqlx::query_as::<_, Employee>(
                r#"
                SELECT id, name, designation, salary, pin_hash, photo
                FROM employees
                WHERE name LIKE ? OR designation LIKE ?
                ORDER BY id DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(like)
            .bind(like)
            .bind(per_page as i64)
            .bind(offset as i64)
            .fetch_all(pool)
            .await?;

            (total, employees)
        }
        None => {
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
                .fetch_one(pool)
                .await?;

            let employees = sqlx::query_as::<_, Employee>(
                r#"
                SELECT id, name, designation, salary, pin_hash, photo
                FROM employees
                ORDER BY id DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(per_page as i64)
            .bind(offset as i64)
            .fetch_all(pool)
            .await?;

            (total, employees)
        }
    };

    Ok((employees, total))
}

pub async fn update(
    pool: &MySqlPool,
    id: u64,
    changes: EmployeeChanges,
) -> Result<u64, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE employees
        SET name = ?, designation = ?, salary = ?, pin_hash = ?, photo = ?
        WHERE id = ?
        "#,
    )
    .bind(changes.name)
    .bind(changes.designation)
    .bind(changes.salary)
    .bind(changes.pin_hash)
    .bind(changes.photo)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Deletes the employee's attendance rows first (no FK cascade is assumed),
/// then the employee itself, inside one transaction.
pub async fn delete(pool: &MySqlPool, id: u64) -> Result<u64, StoreError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected())
}
