use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    error::Result,
    models::transaction::{Category, Transaction},
};

/// Persistent storage of expense records. Reads and writes are scoped to the
/// owning user wherever ownership matters.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists a new transaction.
    async fn insert(&self, transaction: &Transaction) -> Result<Transaction>;

    /// Finds a transaction by its ID, regardless of owner.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>>;

    /// Lists all transactions owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Transaction>>;

    /// Rewrites an existing transaction owned by `transaction.user_id`.
    /// Returns `None` when no such record exists for that owner.
    async fn update(&self, transaction: &Transaction) -> Result<Option<Transaction>>;

    /// Deletes the transaction `id` owned by `user_id`, returning the
    /// removed record. Returns `None` when no such record exists for that
    /// owner.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<Option<Transaction>>;

    /// Sums amounts per category for the transactions owned by `user_id`.
    async fn category_totals(&self, user_id: Uuid) -> Result<Vec<(Category, f64)>>;
}

/// `TransactionStore` backed by PostgreSQL.
pub struct PgTransactionStore {
    pool: Pool,
}

impl PgTransactionStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// A helper function to map a `tokio_postgres::Row` to a `Transaction`.
fn row_to_transaction(row: &Row) -> Result<Transaction> {
    Ok(Transaction {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        description: row.try_get("description")?,
        payment_type: row.try_get("payment_type")?,
        category: row.try_get("category")?,
        amount: row.try_get("amount")?,
        location: row.try_get("location")?,
        date: row.try_get("date")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl TransactionStore for PgTransactionStore {
    async fn insert(&self, transaction: &Transaction) -> Result<Transaction> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                r#"
                INSERT INTO transactions (id, user_id, description, payment_type, category, amount, location, date, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id, user_id, description, payment_type, category, amount, location, date, created_at, updated_at
                "#,
                &[
                    &transaction.id,
                    &transaction.user_id,
                    &transaction.description,
                    &transaction.payment_type,
                    &transaction.category,
                    &transaction.amount,
                    &transaction.location,
                    &transaction.date,
                    &transaction.created_at,
                    &transaction.updated_at,
                ],
            )
            .await?;
        row_to_transaction(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT id, user_id, description, payment_type, category, amount, location, date, created_at, updated_at
                FROM transactions
                WHERE id = $1
                "#,
                &[&id],
            )
            .await?;
        row.map(|r| row_to_transaction(&r)).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT id, user_id, description, payment_type, category, amount, location, date, created_at, updated_at
                FROM transactions
                WHERE user_id = $1
                ORDER BY created_at DESC
                "#,
                &[&user_id],
            )
            .await?;
        rows.iter().map(row_to_transaction).collect()
    }

    async fn update(&self, transaction: &Transaction) -> Result<Option<Transaction>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                UPDATE transactions
                SET description = $1, payment_type = $2, category = $3,
                    amount = $4, location = $5, date = $6, updated_at = NOW()
                WHERE id = $7 AND user_id = $8
                RETURNING id, user_id, description, payment_type, category, amount, location, date, created_at, updated_at
                "#,
                &[
                    &transaction.description,
                    &transaction.payment_type,
                    &transaction.category,
                    &transaction.amount,
                    &transaction.location,
                    &transaction.date,
                    &transaction.id,
                    &transaction.user_id,
                ],
            )
            .await?;
        row.map(|r| row_to_transaction(&r)).transpose()
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<Option<Transaction>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                DELETE FROM transactions
                WHERE id = $1 AND user_id = $2
                RETURNING id, user_id, description, payment_type, category, amount, location, date, created_at, updated_at
                "#,
                &[&id, &user_id],
            )
            .await?;
        row.map(|r| row_to_transaction(&r)).transpose()
    }

    async fn category_totals(&self, user_id: Uuid) -> Result<Vec<(Category, f64)>> {
        let client = self.pool.get().await?;
        let rows = client
            .query(
                r#"
                SELECT category, SUM(amount) AS total_amount
                FROM transactions
                WHERE user_id = $1
                GROUP BY category
                "#,
                &[&user_id],
            )
            .await?;
        rows.iter()
            .map(|row| Ok((row.try_get("category")?, row.try_get("total_amount")?)))
            .collect()
    }
}
