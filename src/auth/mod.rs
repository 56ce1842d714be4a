mod login;
mod logout;
mod sign_up;
mod verify;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{routing::post, Router};
use rand::Rng;

use crate::{AppResult, AppState};

pub use login::SignInRequest;
pub use sign_up::SignUpRequest;
pub use verify::VerifyRequest;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up::sign_up))
        .route("/verify-code", post(verify::verify_code))
        .route("/sign-in", post(login::login))
        .route("/sign-out", post(logout::logout))
}

/// Six random digits.
pub(crate) fn new_verify_code() -> String {
    rand::rng().random_range(100_000..1_000_000).to_string()
}

/// Hashes with argon2id off the async executor.
pub async fn hash_password(password: String) -> AppResult<String> {
    let hash = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
    })
    .await
    .map_err(anyhow::Error::from)?
    .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;

    Ok(hash)
}

pub(crate) async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    let matches = tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)?;
        Ok::<_, argon2::password_hash::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
        )
    })
    .await
    .map_err(anyhow::Error::from)?
    .map_err(|e| anyhow::anyhow!("stored password hash is unreadable: {e}"))?;

    Ok(matches)
}
