use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::api::{AuthError, AuthService};
use crate::models::{Account, Credentials, RegistrationInfo, Role};
use crate::navigation::{Navigator, Route};
use crate::storage::{Storage, TOKEN_KEY, USER_KEY};

/// An authenticated account together with the token the backend issued.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub account: Account,
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Owns the session for one application root.
///
/// The session is either fully present or absent. Every mutation is written
/// through to storage and navigated under the state lock, so memory, storage
/// and the last route never disagree once an action has returned, even on a
/// multi-threaded runtime. Actions take `&self`; share the store with `Arc`.
pub struct SessionStore {
    auth: Arc<dyn AuthService>,
    storage: Arc<dyn Storage>,
    navigator: Arc<dyn Navigator>,
    current: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Build the store and rehydrate any session persisted by a previous run.
    /// The restored token is not re-validated against the backend.
    pub fn new(
        auth: Arc<dyn AuthService>,
        storage: Arc<dyn Storage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let restored = match Self::load_snapshot(storage.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to restore session, starting signed out");
                None
            }
        };
        debug!(restored = restored.is_some(), "Session store ready");

        Self {
            auth,
            storage,
            navigator,
            current: Mutex::new(restored),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.lock().as_ref().map(|s| s.account.role)
    }

    pub fn account(&self) -> Option<Account> {
        self.lock().as_ref().map(|s| s.account.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.token.clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.lock().clone()
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Authenticate and replace the current session.
    ///
    /// On success the new session is persisted and the navigator is sent to
    /// the dashboard for the account's role. On failure nothing changes and
    /// the backend's error is returned as-is. If the session cannot be
    /// persisted, storage is rolled back and `AuthError::Storage` is returned.
    ///
    /// Overlapping calls are not deduplicated: whichever response arrives
    /// last becomes the session.
    pub async fn login(&self, credentials: &Credentials) -> Result<Account, AuthError> {
        if !credentials.is_complete() {
            return Err(AuthError::MissingCredentials);
        }

        let response = match self.auth.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, kind = e.kind().as_str(), "Login failed");
                return Err(e);
            }
        };

        let session = Session {
            account: response.user,
            token: response.token,
        };
        let account = session.account.clone();

        let mut current = self.lock();
        if let Err(e) = self.write_snapshot(&session) {
            error!(error = %e, "Failed to persist session");
            self.restore_snapshot(current.as_ref());
            return Err(AuthError::Storage(format!("{:#}", e)));
        }
        *current = Some(session);

        info!(user_id = account.id, role = %account.role, "Login successful");
        self.navigator.navigate(Route::dashboard_for(account.role));
        Ok(account)
    }

    /// Create an account. Does not sign in.
    ///
    /// Returns the backend's confirmation for the front-end to show and sends
    /// the navigator to the login page.
    pub async fn register(&self, info: &RegistrationInfo) -> Result<String, AuthError> {
        match self.auth.register(info).await {
            Ok(response) => {
                info!(email = %info.email, role = %info.role, "Registration successful");
                self.navigator.navigate(Route::Login);
                Ok(response.message)
            }
            Err(e) => {
                error!(error = %e, kind = e.kind().as_str(), "Registration failed");
                Err(e)
            }
        }
    }

    /// Sign out. Always succeeds, even when storage cannot be cleared.
    pub fn logout(&self) {
        let mut current = self.lock();
        *current = None;
        if let Err(e) = self.clear_persisted() {
            warn!(error = %e, "Failed to clear persisted session");
        }

        info!("Logged out");
        self.navigator.navigate(Route::Login);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Read the persisted pair. Anything short of both keys decoding cleanly
    /// is treated as no session.
    fn load_snapshot(storage: &dyn Storage) -> Result<Option<Session>> {
        let user = storage.get(USER_KEY).context("Failed to read persisted user")?;
        let token = storage.get(TOKEN_KEY).context("Failed to read persisted token")?;

        match (user, token) {
            (Some(user), Some(token)) => {
                let account: Account =
                    serde_json::from_str(&user).context("Failed to parse persisted user")?;
                Ok(Some(Session { account, token }))
            }
            (None, None) => Ok(None),
            (user, token) => {
                warn!(
                    has_user = user.is_some(),
                    has_token = token.is_some(),
                    "Ignoring incomplete persisted session"
                );
                Ok(None)
            }
        }
    }

    /// Put storage back to the session still held in memory after a failed
    /// write left it half-updated.
    fn restore_snapshot(&self, previous: Option<&Session>) {
        let result = match previous {
            Some(session) => self.write_snapshot(session),
            None => self.clear_persisted(),
        };
        if let Err(e) = result {
            warn!(error = %e, "Failed to roll back persisted session");
        }
    }

    fn write_snapshot(&self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.account)?;
        self.storage.set(USER_KEY, &user)?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        Ok(())
    }

    fn clear_persisted(&self) -> Result<()> {
        let user = self.storage.remove(USER_KEY);
        let token = self.storage.remove(TOKEN_KEY);
        user.and(token)
    }

    // A panic mid-action cannot leave a half-written session: the value is replaced whole.
    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}
