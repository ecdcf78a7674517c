use crate::error::{AppError, Result};
use crate::models::user::{Gender, User};
use crate::repositories::user::UserStore;
use argon2::{
    Argon2, ParamsBuilder,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::Utc;
use rand::{RngCore, rngs::OsRng};
use uuid::Uuid;
use zeroize::Zeroize;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 1;

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the hashed password.
pub fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    Ok(password_hash)
}

/// Verifies a password against a hash.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The hash to verify against.
///
/// # Returns
///
/// A `Result` containing `true` if the password is valid, `false` otherwise.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let argon2 = Argon2::default();
    let result = argon2.verify_password(&password_bytes, &parsed_hash).is_ok();

    password_bytes.zeroize();
    Ok(result)
}

/// Derives a user's avatar URL from username and gender. Deterministic and
/// fixed at sign-up time.
pub fn profile_picture_url(username: &str, gender: Gender) -> String {
    match gender {
        Gender::Male => format!("https://avatar.iran.liara.run/public/boy?username={}", username),
        _ => format!("https://avatar.iran.liara.run/public/girl?username={}", username),
    }
}

/// Creates a new user.
///
/// The username pre-check is advisory; the store's unique index is the
/// authority and a racing duplicate insert also fails with `DuplicateUser`.
///
/// # Arguments
///
/// * `users` - The user store.
/// * `username` - The user's username.
/// * `name` - The user's full name.
/// * `password` - The user's password, hashed before it is persisted.
/// * `gender` - The user's gender.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn sign_up(
    users: &dyn UserStore,
    username: String,
    name: String,
    password: String,
    gender: Gender,
) -> Result<User> {
    tracing::debug!("🔐 Creating user: {}", username);

    if users.find_by_username(&username).await?.is_some() {
        return Err(AppError::DuplicateUser);
    }

    let hashed_password = hash_password(&password)?;
    let profile_picture = profile_picture_url(&username, gender);
    let now = Utc::now();

    let user = users
        .insert(&User {
            id: Uuid::new_v4(),
            username,
            name,
            password: hashed_password,
            gender,
            profile_picture,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user by username and password.
///
/// Unknown usernames and wrong passwords fail with the same
/// `InvalidCredentials` value; nothing distinguishes the two cases.
///
/// # Arguments
///
/// * `users` - The user store.
/// * `username` - The user's username.
/// * `password` - The user's password.
///
/// # Returns
///
/// A `Result` containing the authenticated `User`.
pub async fn authenticate(
    users: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<User> {
    tracing::debug!("🔐 Authenticating user: {}", username);

    let user = users
        .find_by_username(username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok(user)
}

/// Resolves a session's stored user id back into the user record.
///
/// `SessionUserNotFound` means the account behind the session is gone;
/// callers must treat that session as unauthenticated, not as a request
/// failure.
pub async fn deserialize_user(users: &dyn UserStore, user_id: Uuid) -> Result<User> {
    users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::SessionUserNotFound)
}
