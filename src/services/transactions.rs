use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::transaction::{Category, PaymentType, Transaction},
    repositories::transaction::TransactionStore,
};

/// Creates a new transaction owned by `user_id`.
///
/// # Arguments
///
/// * `store` - The transaction store.
/// * `user_id` - The ID of the owning user.
/// * `description` - What the transaction was for.
/// * `payment_type` - How it was paid.
/// * `category` - The spending category.
/// * `amount` - The amount of money involved.
/// * `location` - Where it happened, if recorded.
/// * `date` - The calendar date of the transaction.
///
/// # Returns
///
/// A `Result` containing the created `Transaction`.
pub async fn create(
    store: &dyn TransactionStore,
    user_id: Uuid,
    description: String,
    payment_type: PaymentType,
    category: Category,
    amount: f64,
    location: Option<String>,
    date: NaiveDate,
) -> Result<Transaction> {
    if description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".to_string()));
    }

    let now = Utc::now();
    let transaction = store
        .insert(&Transaction {
            id: Uuid::new_v4(),
            user_id,
            description,
            payment_type,
            category,
            amount,
            location,
            date,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!("✅ Transaction created: {}", transaction.id);
    Ok(transaction)
}

/// The caller-editable fields of an update. `None` leaves a field unchanged.
pub struct TransactionPatch {
    pub description: Option<String>,
    pub payment_type: Option<PaymentType>,
    pub category: Option<Category>,
    pub amount: Option<f64>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Applies `patch` to the transaction `id` owned by `user_id`.
///
/// A record that is absent, or owned by someone else, fails with `NotFound`;
/// ownership is never disclosed.
pub async fn update(
    store: &dyn TransactionStore,
    user_id: Uuid,
    id: Uuid,
    patch: TransactionPatch,
) -> Result<Transaction> {
    let existing = store
        .find_by_id(id)
        .await?
        .filter(|t| t.user_id == user_id)
        .ok_or(AppError::NotFound)?;

    if let Some(description) = &patch.description {
        if description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
    }

    let updated = Transaction {
        id: existing.id,
        user_id: existing.user_id,
        description: patch.description.unwrap_or(existing.description),
        payment_type: patch.payment_type.unwrap_or(existing.payment_type),
        category: patch.category.unwrap_or(existing.category),
        amount: patch.amount.unwrap_or(existing.amount),
        location: patch.location.or(existing.location),
        date: patch.date.unwrap_or(existing.date),
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };

    store.update(&updated).await?.ok_or(AppError::NotFound)
}

/// Deletes the transaction `id` owned by `user_id`, returning the removed
/// record. Absent or foreign records fail with `NotFound`.
pub async fn delete(
    store: &dyn TransactionStore,
    user_id: Uuid,
    id: Uuid,
) -> Result<Transaction> {
    let deleted = store.delete(id, user_id).await?.ok_or(AppError::NotFound)?;
    tracing::info!("✅ Transaction deleted: {}", deleted.id);
    Ok(deleted)
}

/// Lists the transactions owned by `user_id`, newest first.
pub async fn list_for_user(
    store: &dyn TransactionStore,
    user_id: Uuid,
) -> Result<Vec<Transaction>> {
    store.list_by_user(user_id).await
}

/// Fetches the transaction `id` as seen by `user_id`: records owned by
/// someone else are indistinguishable from absent ones.
pub async fn find_for_user(
    store: &dyn TransactionStore,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<Transaction>> {
    Ok(store.find_by_id(id).await?.filter(|t| t.user_id == user_id))
}
