use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

/// The gender recorded on a user account. Drives the deterministic avatar
/// choice at sign-up and is otherwise opaque to the server.
#[derive(Enum, ToSql, FromSql, Clone, Copy, Debug, Eq, PartialEq)]
#[graphql(rename_items = "lowercase")]
#[postgres(name = "gender")]
pub enum Gender {
    #[postgres(name = "male")]
    Male,
    #[postgres(name = "female")]
    Female,
    #[postgres(name = "other")]
    Other,
}

/// Represents a user in the system.
///
/// The GraphQL shape exposes only the public profile fields; the password
/// hash and timestamps are skipped and cannot be selected at all.
#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's username. Globally unique.
    pub username: String,
    /// The user's full name.
    pub name: String,
    /// The user's hashed password. Never exposed through GraphQL.
    #[graphql(skip)]
    pub password: String,
    /// The user's gender.
    pub gender: Gender,
    /// The user's avatar URL, derived from username and gender at creation.
    pub profile_picture: String,
    /// The timestamp when the user was created.
    #[graphql(skip)]
    pub created_at: DateTime<Utc>,
    /// The timestamp when the user was last updated.
    #[graphql(skip)]
    pub updated_at: DateTime<Utc>,
}
