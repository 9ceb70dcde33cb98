use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

lazy_static! {
    // Verified against when the username is unknown, so both login failures cost one Argon2 run.
    static ref DUMMY_HASH: Option<String> = hash_password("authgate-dummy-password").ok();
}

fn argon2_error(op: &'static str) -> impl FnOnce(password_hash::Error) -> anyhow::Error {
    move |e| {
        error!(error = %e, op, "argon2 error");
        anyhow::anyhow!("{op}: {e}")
    }
}

/// Hashes with Argon2id at the crate's fixed default cost and a fresh random salt.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(argon2_error("hash password"))?
        .to_string())
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unparsable.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(argon2_error("parse stored hash"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Checks a login attempt. `stored` is `None` for an unknown username, which
/// still runs a full verification and always answers `false`.
pub fn verify_credentials(plain: &str, stored: Option<&str>) -> anyhow::Result<bool> {
    match stored {
        Some(hash) => verify_password(plain, hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(plain, dummy);
            }
            Ok(false)
        }
    }
}

/// `hash_password` on the blocking pool; Argon2 is CPU-bound.
pub async fn hash_password_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain)).await?
}

/// `verify_credentials` on the blocking pool.
pub async fn verify_credentials_blocking(
    plain: String,
    stored: Option<String>,
) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_credentials(&plain, stored.as_deref())).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_against_its_own_password() {
        let hash = hash_password("s3cret").expect("hashing should succeed");
        assert!(verify_password("s3cret", &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_a_different_salt_each_time() {
        let a = hash_password("s3cret").expect("hash a");
        let b = hash_password("s3cret").expect("hash b");
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("s3cret"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(err.to_string().contains("parse stored hash"));
    }

    #[test]
    fn unknown_user_never_matches_even_the_dummy_password() {
        assert!(DUMMY_HASH.is_some());
        assert!(!verify_credentials("authgate-dummy-password", None).expect("verify"));
        assert!(!verify_credentials("anything", None).expect("verify"));
    }

    #[tokio::test]
    async fn blocking_wrappers_hash_and_verify() {
        let hash = hash_password_blocking("s3cret".into()).await.expect("hash");
        assert!(verify_credentials_blocking("s3cret".into(), Some(hash.clone()))
            .await
            .expect("verify"));
        assert!(!verify_credentials_blocking("nope".into(), Some(hash))
            .await
            .expect("verify"));
    }
}
