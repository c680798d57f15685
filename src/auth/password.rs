use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Hashes the shared admin password or an employee PIN.
pub fn hash_secret(secret: &str) -> String {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(secret.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

pub fn verify_secret(secret: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let parsed = PasswordHash::new(hashed)?;

    argon2.verify_password(secret.as_bytes(), &parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_verifies_against_its_own_hash() {
        let hash = hash_secret("4321");
        assert!(verify_secret("4321", &hash).is_ok());
        assert!(verify_secret("1234", &hash).is_err());
    }
}
