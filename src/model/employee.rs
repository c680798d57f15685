/// Employee row. The PIN is stored argon2-hashed, so this struct is never
/// serialized directly; API responses use their own DTOs.
#[derive(Debug, sqlx::FromRow)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub designation: String,
    pub salary: f64,
    pub pin_hash: String,
    pub photo: Option<String>,
}
