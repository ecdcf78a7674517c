use async_graphql::{Context, ErrorExtensions, ID, Object, Result};
use uuid::Uuid;

use crate::models::transaction::Transaction;
use crate::models::user::User;
use crate::services::transactions as transaction_service;

use super::context::AuthContext;
use super::types::CategoryStatistics;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The user behind the current session, or null when unauthenticated.
    async fn auth_user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let auth = ctx.data::<AuthContext>()?;
        auth.get_user().await.map_err(|e| e.extend())
    }

    /// A user's public profile by id. Null when the id does not resolve.
    async fn user(&self, ctx: &Context<'_>, user_id: ID) -> Result<Option<User>> {
        let auth = ctx.data::<AuthContext>()?;
        let Ok(id) = Uuid::parse_str(user_id.as_str()) else {
            return Ok(None);
        };
        auth.users().find_by_id(id).await.map_err(|e| e.extend())
    }

    /// The authenticated user's transactions, newest first.
    async fn transactions(&self, ctx: &Context<'_>) -> Result<Vec<Transaction>> {
        let auth = ctx.data::<AuthContext>()?;
        let user = auth.require_user().await.map_err(|e| e.extend())?;
        transaction_service::list_for_user(auth.transactions(), user.id)
            .await
            .map_err(|e| e.extend())
    }

    /// One of the authenticated user's transactions by id. Records owned by
    /// someone else are indistinguishable from absent ones.
    async fn transaction(
        &self,
        ctx: &Context<'_>,
        transaction_id: ID,
    ) -> Result<Option<Transaction>> {
        let auth = ctx.data::<AuthContext>()?;
        let user = auth.require_user().await.map_err(|e| e.extend())?;
        let Ok(id) = Uuid::parse_str(transaction_id.as_str()) else {
            return Ok(None);
        };
        transaction_service::find_for_user(auth.transactions(), user.id, id)
            .await
            .map_err(|e| e.extend())
    }

    /// Per-category amount totals for the authenticated user.
    async fn category_statistics(&self, ctx: &Context<'_>) -> Result<Vec<CategoryStatistics>> {
        let auth = ctx.data::<AuthContext>()?;
        let user = auth.require_user().await.map_err(|e| e.extend())?;
        let totals = auth
            .transactions()
            .category_totals(user.id)
            .await
            .map_err(|e| e.extend())?;
        Ok(totals
            .into_iter()
            .map(|(category, total_amount)| CategoryStatistics {
                category,
                total_amount,
            })
            .collect())
    }
}
