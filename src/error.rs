use async_graphql::ErrorExtensions;
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A database pool error.
    #[error("Database pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A database pool construction error.
    #[error("Database pool build error: {0}")]
    PoolBuild(#[from] deadpool_postgres::CreatePoolError),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A validation error.
    #[error("{0}")]
    Validation(String),

    /// A username collision on sign-up.
    #[error("User already exists")]
    DuplicateUser,

    /// Unknown username or wrong password. The two cases share this single
    /// value so they cannot be told apart.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The operation requires an authenticated caller.
    #[error("Unauthorized")]
    Unauthenticated,

    /// A session references a user id that no longer resolves. Callers treat
    /// the session as anonymous; this never reaches a client.
    #[error("Session user not found")]
    SessionUserNotFound,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl ErrorExtensions for AppError {
    /// Translates an `AppError` into the single client-visible GraphQL error
    /// shape. Internal failures are logged and collapsed to a generic
    /// message; no internal error detail crosses this boundary.
    fn extend(&self) -> async_graphql::Error {
        let (message, code) = match self {
            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                (msg.clone(), "VALIDATION_ERROR")
            }

            AppError::DuplicateUser => {
                tracing::debug!("Duplicate username on sign-up");
                ("User already exists".to_string(), "DUPLICATE_USER")
            }

            AppError::InvalidCredentials => {
                tracing::warn!("Authentication failed");
                ("Invalid username or password".to_string(), "INVALID_CREDENTIALS")
            }

            AppError::Unauthenticated => {
                tracing::warn!("Unauthenticated caller");
                ("Unauthorized".to_string(), "UNAUTHENTICATED")
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                ("Resource not found".to_string(), "NOT_FOUND")
            }

            other => {
                tracing::error!("Internal error: {}", other);
                ("Internal server error".to_string(), "INTERNAL_SERVER_ERROR")
            }
        };

        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}
