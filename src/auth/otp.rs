use std::time::Duration;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use moka::future::Cache;
use once_cell::sync::Lazy;

/// Pending reset codes keyed by destination mobile. Codes expire after five
/// minutes and are single-use.
static PENDING_CODES: Lazy<Cache<String, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(1_000)
        .time_to_live(Duration::from_secs(300))
        .build()
});

fn generate_code() -> String {
    let mut bytes = [0u8; 4];
    OsRng.fill_bytes(&mut bytes);
    format!("{:06}", u32::from_le_bytes(bytes) % 1_000_000)
}

/// Creates and registers a fresh code for the destination, replacing any
/// earlier pending one.
pub async fn issue(destination: &str) -> String {
    let code = generate_code();
    PENDING_CODES
        .insert(destination.to_string(), code.clone())
        .await;
    code
}

/// Consumes the pending code on a match; a second attempt with the same code
/// fails.
pub async fn verify(destination: &str, code: &str) -> bool {
    match PENDING_CODES.get(destination).await {
        Some(expected) if expected == code => {
            PENDING_CODES.invalidate(destination).await;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..32 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[actix_web::test]
    async fn verify_consumes_the_code() {
        let code = issue("9978815870").await;
        assert!(verify("9978815870", &code).await);
        assert!(!verify("9978815870", &code).await);
    }

    #[actix_web::test]
    async fn wrong_code_is_rejected_and_does_not_consume() {
        let code = issue("9978800000").await;
        let wrong = if code == "123456" { "654321" } else { "123456" };
        assert!(!verify("9978800000", wrong).await);
        assert!(verify("9978800000", &code).await);
    }
}
