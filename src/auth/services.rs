use tracing::{info, warn};

use crate::auth::{
    dto::{Credentials, CredentialsRequest},
    error::AuthError,
    jwt::JwtKeys,
    password::{hash_password_blocking, verify_credentials_blocking},
    repo::UserStore,
};

fn validate(req: CredentialsRequest) -> Result<Credentials, AuthError> {
    req.into_credentials().ok_or_else(|| {
        warn!("missing credentials");
        AuthError::Validation
    })
}

/// Registers a user. Validation happens before the store is touched.
pub async fn signup(store: &dyn UserStore, req: CredentialsRequest) -> Result<(), AuthError> {
    let Credentials { username, password } = validate(req)?;

    let hash = hash_password_blocking(password).await?;

    match store.insert(&username, &hash).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "user registered");
            Ok(())
        }
        Err(e) => {
            let err = AuthError::from(e);
            if matches!(err, AuthError::DuplicateUsername) {
                warn!(username = %username, "username already exists");
            }
            Err(err)
        }
    }
}

/// Verifies credentials and returns a signed token.
pub async fn login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    req: CredentialsRequest,
) -> Result<String, AuthError> {
    let Credentials { username, password } = validate(req)?;

    let user = store.find_by_username(&username).await?;
    let stored = user.as_ref().map(|u| u.password_hash.clone());
    let ok = verify_credentials_blocking(password, stored).await?;

    let user = match user {
        Some(u) if ok => u,
        Some(u) => {
            warn!(user_id = u.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }
        None => {
            warn!(username = %username, "login unknown username");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let token = keys.sign(&user)?;
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(token)
}
