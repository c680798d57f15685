use serde::{Deserialize, Serialize};

/// Claims carried by the administrator bearer token. There is a single shared
/// admin credential, so no user id or role travels with the token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub jti: String,
}
