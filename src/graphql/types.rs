use async_graphql::{ComplexObject, Context, ErrorExtensions, InputObject, Result, SimpleObject};
use chrono::NaiveDate;

use crate::models::transaction::{Category, PaymentType, Transaction};
use crate::models::user::{Gender, User};

use super::context::AuthContext;

/// The input for the `signUp` mutation.
#[derive(InputObject)]
pub struct SignUpInput {
    pub username: String,
    pub name: String,
    pub password: String,
    pub gender: Gender,
}

/// The input for the `login` mutation.
#[derive(InputObject)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// The input for the `createTransaction` mutation.
#[derive(InputObject)]
pub struct CreateTransactionInput {
    pub description: String,
    pub payment_type: PaymentType,
    pub category: Category,
    pub amount: f64,
    pub location: Option<String>,
    pub date: NaiveDate,
}

/// The input for the `updateTransaction` mutation. Absent fields are left
/// unchanged.
#[derive(InputObject)]
pub struct UpdateTransactionInput {
    pub transaction_id: async_graphql::ID,
    pub description: Option<String>,
    pub payment_type: Option<PaymentType>,
    pub category: Option<Category>,
    pub amount: Option<f64>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
}

/// The result of the `logout` mutation.
#[derive(SimpleObject)]
pub struct LogoutResult {
    pub message: String,
}

/// Per-category amount totals for one user, for the history chart.
#[derive(SimpleObject)]
pub struct CategoryStatistics {
    pub category: Category,
    pub total_amount: f64,
}

#[ComplexObject]
impl User {
    /// The transactions owned by this user, newest first.
    async fn transactions(&self, ctx: &Context<'_>) -> Result<Vec<Transaction>> {
        let auth = ctx.data::<AuthContext>()?;
        let transactions = crate::services::transactions::list_for_user(auth.transactions(), self.id)
            .await
            .map_err(|e| e.extend())?;
        Ok(transactions)
    }
}

#[ComplexObject]
impl Transaction {
    /// The owner of this transaction, when the account still exists.
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let auth = ctx.data::<AuthContext>()?;
        let user = auth
            .users()
            .find_by_id(self.user_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(user)
    }
}
