/// Singleton row holding the shared administrator credential.
#[derive(Debug, sqlx::FromRow)]
pub struct AdminConfig {
    pub id: u64,
    pub password_hash: String,
}
