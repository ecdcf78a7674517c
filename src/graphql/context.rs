use std::sync::{Arc, Mutex};

use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::{
    config::Config,
    error::{AppError, Result},
    models::session::Session,
    models::user::User,
    repositories::session::SessionStore,
    repositories::transaction::TransactionStore,
    repositories::user::UserStore,
    services::auth as auth_service,
    state::AppState,
};

/// The name of the session cookie.
pub const SESSION_COOKIE: &str = "session_id";

/// Per-request authentication context, constructed fresh in the GraphQL
/// handler for every execution and dropped with the response.
///
/// This is the only gateway resolvers have to the session lifecycle: it
/// reads the request's session cookie once at construction and exposes
/// `get_user` / `authenticate` / `login` / `logout` on top of the stores.
pub struct AuthContext {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    transactions: Arc<dyn TransactionStore>,
    config: Config,
    cookies: Cookies,
    session_id: Mutex<Option<Uuid>>,
}

impl AuthContext {
    /// Builds the context for one request from the shared state and the
    /// request's cookie jar.
    pub fn new(state: &AppState, cookies: Cookies) -> Self {
        let session_id = cookies
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

        Self {
            users: state.users.clone(),
            sessions: state.sessions.clone(),
            transactions: state.transactions.clone(),
            config: state.config.clone(),
            cookies,
            session_id: Mutex::new(session_id),
        }
    }

    /// The user store, for resolvers that read user records directly.
    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    /// The transaction store, for the transaction resolvers.
    pub fn transactions(&self) -> &dyn TransactionStore {
        self.transactions.as_ref()
    }

    fn current_session_id(&self) -> Option<Uuid> {
        *self.session_id.lock().unwrap()
    }

    /// Returns the user behind the current session, or `None` when the
    /// request is unauthenticated. Missing, expired, and unreadable
    /// sessions, and sessions whose user no longer exists, are all just
    /// `None` — never an error.
    pub async fn get_user(&self) -> Result<Option<User>> {
        let Some(session_id) = self.current_session_id() else {
            return Ok(None);
        };

        let Some(session) = self.sessions.load(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            tracing::debug!("❌ Session expired for user: {}", session.user_id);
            if let Err(e) = self.sessions.delete(session_id).await {
                tracing::warn!("Failed to drop expired session {}: {}", session_id, e);
            }
            return Ok(None);
        }

        match auth_service::deserialize_user(self.users.as_ref(), session.user_id).await {
            Ok(user) => Ok(Some(user)),
            Err(AppError::SessionUserNotFound) => {
                // The account behind this session is gone; drop the record.
                tracing::debug!("❌ Session {} references a deleted user", session_id);
                if let Err(e) = self.sessions.delete(session_id).await {
                    tracing::warn!("Failed to drop stale session {}: {}", session_id, e);
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Returns the authenticated user or fails with `Unauthenticated`.
    pub async fn require_user(&self) -> Result<User> {
        self.get_user().await?.ok_or(AppError::Unauthenticated)
    }

    /// Verifies credentials against the user store. Does not touch the
    /// session; callers decide whether to `login` afterwards.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        auth_service::authenticate(self.users.as_ref(), username, password).await
    }

    /// Establishes a session for `user` and sets the session cookie.
    ///
    /// The record is written before the cookie is set, so a store failure
    /// leaves the client without a cookie rather than with a dangling one.
    /// Logging in again as the same user refreshes the existing session's
    /// expiry instead of minting a second record.
    pub async fn login(&self, user: &User) -> Result<()> {
        let duration_days = self.config.session_duration_days;
        let ttl_seconds = (duration_days * 86400) as u64;
        let session = Session::new(user.id, duration_days);

        if let Some(session_id) = self.current_session_id() {
            if let Some(existing) = self.sessions.load(session_id).await? {
                if existing.user_id == user.id && !existing.is_expired() {
                    self.sessions.insert(session_id, &session, ttl_seconds).await?;
                    self.cookies
                        .add(session_cookie(session_id.to_string(), duration_days));
                    tracing::debug!("🔑 Session refreshed: {}", session_id);
                    return Ok(());
                }
            }
        }

        let session_id = Uuid::new_v4();
        self.sessions.insert(session_id, &session, ttl_seconds).await?;
        self.cookies
            .add(session_cookie(session_id.to_string(), duration_days));
        *self.session_id.lock().unwrap() = Some(session_id);

        tracing::info!("✅ Session established for user: {}", user.id);
        Ok(())
    }

    /// Destroys the current session record and clears the session cookie.
    /// A request with no session is a no-op success.
    pub async fn logout(&self) -> Result<()> {
        let session_id = self.session_id.lock().unwrap().take();

        if let Some(session_id) = session_id {
            self.sessions.delete(session_id).await?;
            tracing::info!("👋 Session destroyed: {}", session_id);
        }

        let mut removal = Cookie::new(SESSION_COOKIE, "");
        removal.set_max_age(Duration::seconds(0));
        removal.set_path("/");
        self.cookies.remove(removal);

        Ok(())
    }
}

/// Creates the HTTP-only session cookie.
fn session_cookie(value: String, max_age_days: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);

    let is_production =
        std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()) == "production";

    cookie.set_http_only(true);

    if is_production {
        cookie.set_secure(true);
    }

    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_days * 86400));
    cookie.set_path("/");

    cookie
}
