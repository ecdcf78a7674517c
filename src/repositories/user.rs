use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::error::SqlState;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// Persistent storage of user accounts.
///
/// The store is externally synchronized; the unique index on `username` is
/// the authority on uniqueness and a racing insert surfaces as
/// [`AppError::DuplicateUser`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user. Fails with `DuplicateUser` when the username is
    /// already taken.
    async fn insert(&self, user: &User) -> Result<User>;

    /// Finds a user by their ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Finds a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// `UserStore` backed by PostgreSQL.
pub struct PgUserStore {
    pool: Pool,
}

impl PgUserStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        password: row.try_get("password")?,
        gender: row.try_get("gender")?,
        profile_picture: row.try_get("profile_picture")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> Result<User> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO users (id, username, name, password, gender, profile_picture, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, username, name, password, gender, profile_picture, created_at, updated_at
                "#,
                &[
                    &user.id,
                    &user.username,
                    &user.name,
                    &user.password,
                    &user.gender,
                    &user.profile_picture,
                    &user.created_at,
                    &user.updated_at,
                ],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    AppError::DuplicateUser
                } else {
                    AppError::from(e)
                }
            })?;
        row_to_user(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, username, name, password, gender, profile_picture, created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
                &[&id],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, username, name, password, gender, profile_picture, created_at, updated_at
                FROM users
                WHERE username = $1
                "#,
                &[&username],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }
}
