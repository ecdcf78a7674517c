use async_graphql::{Context, ErrorExtensions, ID, Object, Result};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::transaction::Transaction;
use crate::models::user::User;
use crate::services::auth as auth_service;
use crate::services::transactions as transaction_service;
use crate::validation::auth::{validate_login, validate_sign_up};

use super::context::AuthContext;
use super::types::{
    CreateTransactionInput, LoginInput, LogoutResult, SignUpInput, UpdateTransactionInput,
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates an account and immediately establishes a session for it.
    async fn sign_up(&self, ctx: &Context<'_>, input: SignUpInput) -> Result<User> {
        let auth = ctx.data::<AuthContext>()?;
        validate_sign_up(&input).map_err(|e| e.extend())?;

        let user = auth_service::sign_up(
            auth.users(),
            input.username,
            input.name,
            input.password,
            input.gender,
        )
        .await
        .map_err(|e| e.extend())?;

        auth.login(&user).await.map_err(|e| e.extend())?;
        Ok(user)
    }

    /// Verifies credentials and establishes a session.
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<User> {
        let auth = ctx.data::<AuthContext>()?;
        validate_login(&input).map_err(|e| e.extend())?;

        let user = auth
            .authenticate(&input.username, &input.password)
            .await
            .map_err(|e| e.extend())?;

        auth.login(&user).await.map_err(|e| e.extend())?;
        Ok(user)
    }

    /// Destroys the current session record and clears the session cookie.
    async fn logout(&self, ctx: &Context<'_>) -> Result<LogoutResult> {
        let auth = ctx.data::<AuthContext>()?;
        auth.logout().await.map_err(|e| e.extend())?;
        Ok(LogoutResult {
            message: "Logged Out Successfully".to_string(),
        })
    }

    /// Records a new transaction for the authenticated user.
    async fn create_transaction(
        &self,
        ctx: &Context<'_>,
        input: CreateTransactionInput,
    ) -> Result<Transaction> {
        let auth = ctx.data::<AuthContext>()?;
        let user = auth.require_user().await.map_err(|e| e.extend())?;
        transaction_service::create(
            auth.transactions(),
            user.id,
            input.description,
            input.payment_type,
            input.category,
            input.amount,
            input.location,
            input.date,
        )
        .await
        .map_err(|e| e.extend())
    }

    /// Edits one of the authenticated user's transactions.
    async fn update_transaction(
        &self,
        ctx: &Context<'_>,
        input: UpdateTransactionInput,
    ) -> Result<Transaction> {
        let auth = ctx.data::<AuthContext>()?;
        let user = auth.require_user().await.map_err(|e| e.extend())?;
        let id = Uuid::parse_str(input.transaction_id.as_str())
            .map_err(|_| AppError::NotFound.extend())?;

        let patch = transaction_service::TransactionPatch {
            description: input.description,
            payment_type: input.payment_type,
            category: input.category,
            amount: input.amount,
            location: input.location,
            date: input.date,
        };

        transaction_service::update(auth.transactions(), user.id, id, patch)
            .await
            .map_err(|e| e.extend())
    }

    /// Deletes one of the authenticated user's transactions, returning the
    /// removed record.
    async fn delete_transaction(
        &self,
        ctx: &Context<'_>,
        transaction_id: ID,
    ) -> Result<Transaction> {
        let auth = ctx.data::<AuthContext>()?;
        let user = auth.require_user().await.map_err(|e| e.extend())?;
        let id = Uuid::parse_str(transaction_id.as_str())
            .map_err(|_| AppError::NotFound.extend())?;

        transaction_service::delete(auth.transactions(), user.id, id)
            .await
            .map_err(|e| e.extend())
    }
}
