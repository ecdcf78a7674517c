use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

/// How a transaction was paid.
#[derive(Enum, ToSql, FromSql, Clone, Copy, Debug, Eq, PartialEq)]
#[graphql(rename_items = "lowercase")]
#[postgres(name = "payment_type")]
pub enum PaymentType {
    #[postgres(name = "cash")]
    Cash,
    #[postgres(name = "card")]
    Card,
    #[postgres(name = "upi")]
    Upi,
}

/// The spending category a transaction falls into.
#[derive(Enum, ToSql, FromSql, Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[graphql(rename_items = "lowercase")]
#[postgres(name = "category")]
pub enum Category {
    #[postgres(name = "saving")]
    Saving,
    #[postgres(name = "expense")]
    Expense,
    #[postgres(name = "investment")]
    Investment,
}

/// Represents a single expense/income record owned by a user.
#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Transaction {
    /// The unique identifier for the transaction.
    pub id: Uuid,
    /// The ID of the owning user.
    pub user_id: Uuid,
    /// What the transaction was for.
    pub description: String,
    /// How it was paid.
    pub payment_type: PaymentType,
    /// The spending category.
    pub category: Category,
    /// The amount of money involved.
    pub amount: f64,
    /// Where the transaction happened, if recorded.
    pub location: Option<String>,
    /// The calendar date of the transaction.
    pub date: NaiveDate,
    /// The timestamp when the record was created.
    #[graphql(skip)]
    pub created_at: DateTime<Utc>,
    /// The timestamp when the record was last updated.
    #[graphql(skip)]
    pub updated_at: DateTime<Utc>,
}
