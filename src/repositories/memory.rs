//! In-memory store implementations.
//!
//! Back the hermetic test suite and local development without PostgreSQL or
//! Redis. Behavior mirrors the production stores: unique usernames, owner
//! scoping, newest-first listings.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::session::Session,
    models::transaction::{Category, Transaction},
    models::user::User,
};

use super::session::SessionStore;
use super::transaction::TransactionStore;
use super::user::UserStore;

/// `UserStore` over a `HashMap`.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    /// The number of stored users.
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::DuplicateUser);
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// `SessionStore` over a `HashMap`. The time-to-live is ignored; expiry is
/// enforced by the `expires_at` check every caller performs.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl MemorySessionStore {
    /// The number of stored sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session_id: Uuid, session: &Session, _ttl_seconds: u64) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session_id, session.clone());
        Ok(())
    }

    async fn load(&self, session_id: Uuid) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn delete(&self, session_id: Uuid) -> Result<()> {
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }
}

/// `TransactionStore` over a `HashMap`.
#[derive(Default)]
pub struct MemoryTransactionStore {
    transactions: RwLock<HashMap<Uuid, Transaction>>,
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn insert(&self, transaction: &Transaction) -> Result<Transaction> {
        self.transactions
            .write()
            .await
            .insert(transaction.id, transaction.clone());
        Ok(transaction.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>> {
        Ok(self.transactions.read().await.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        let mut owned: Vec<Transaction> = self
            .transactions
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(&self, transaction: &Transaction) -> Result<Option<Transaction>> {
        let mut transactions = self.transactions.write().await;
        match transactions.get(&transaction.id) {
            Some(existing) if existing.user_id == transaction.user_id => {
                transactions.insert(transaction.id, transaction.clone());
                Ok(Some(transaction.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<Option<Transaction>> {
        let mut transactions = self.transactions.write().await;
        match transactions.get(&id) {
            Some(existing) if existing.user_id == user_id => Ok(transactions.remove(&id)),
            _ => Ok(None),
        }
    }

    async fn category_totals(&self, user_id: Uuid) -> Result<Vec<(Category, f64)>> {
        let mut totals: HashMap<Category, f64> = HashMap::new();
        for transaction in self.transactions.read().await.values() {
            if transaction.user_id == user_id {
                *totals.entry(transaction.category).or_insert(0.0) += transaction.amount;
            }
        }
        Ok(totals.into_iter().collect())
    }
}
