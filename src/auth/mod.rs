//! Authentication client
//!
//! Wraps the backend's `/auth` endpoints and caches the resulting
//! session (token pair plus user profile). Every other sub-client
//! borrows this cache for bearer tokens, and the permission predicates
//! below answer both declarative ("render this control?") and
//! imperative ("issue this request?") gating from the same cached
//! profile. The backend remains the sole enforcement authority; the
//! predicates are UX-only and fail closed.

mod session;

pub use session::Session;

use std::sync::{Arc, RwLock};

use log::{debug, info, warn};
use reqwest::Client;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::model::auth::VerifyResponse;
use crate::model::{AuthRequest, AuthResponse, Authority, RegistrationRequest, UserResponse};

/// Auth client with cached session state
#[derive(Clone)]
pub struct Auth {
    url: String,
    http_client: Client,
    session: Arc<RwLock<Option<Session>>>,
}

impl Auth {
    /// Create a new Auth client
    pub fn new(url: &str, http_client: Client) -> Self {
        Self {
            url: url.to_string(),
            http_client,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Authenticate with email and password.
    ///
    /// On success the token pair is persisted and the full user profile
    /// (including role and authority set) is fetched and cached in one
    /// additional round trip. On any failure the cached session is left
    /// as it was.
    pub async fn login(&self, request: &AuthRequest) -> Result<AuthResponse, Error> {
        let url = format!("{}/auth/login", self.url);

        let response: AuthResponse = Fetch::post(&self.http_client, &url)
            .json(request)?
            .execute()
            .await?;

        // The login response already carries the identity and role;
        // the principal fetch replaces it with the complete profile
        // (editable/deletable flags included).
        let user = self.fetch_principal(&response.access_token).await?;

        let session = Session::new(
            response.access_token.clone(),
            response.refresh_token.clone(),
            user,
        );
        *self.session.write().unwrap() = Some(session);

        info!("authenticated as {}", response.email);
        Ok(response)
    }

    /// Register a new user account. Gated server-side by `user::create`;
    /// the caller's access token authenticates the request.
    pub async fn sign_up(&self, request: &RegistrationRequest) -> Result<(), Error> {
        request.validate()?;

        let url = format!("{}/auth/sign-up", self.url);
        let token = self.require_token()?;

        Fetch::post(&self.http_client, &url)
            .bearer_auth(&token)
            .json(request)?
            .execute_empty()
            .await
    }

    /// Exchange the refresh token for a new token pair
    pub async fn refresh(&self) -> Result<AuthResponse, Error> {
        let refresh_token = self
            .session()
            .map(|s| s.refresh_token)
            .ok_or_else(|| Error::auth("missing session"))?;

        let url = format!("{}/auth/refresh", self.url);
        let response: AuthResponse = Fetch::post(&self.http_client, &url)
            .bearer_auth(&refresh_token)
            .execute()
            .await?;

        {
            let mut guard = self.session.write().unwrap();
            if let Some(session) = guard.as_mut() {
                session.access_token = response.access_token.clone();
                session.refresh_token = response.refresh_token.clone();
            }
        }

        debug!("token pair refreshed");
        Ok(response)
    }

    /// Verify the cached access token against the backend.
    ///
    /// Never trusts the local token without a round trip. On a missing
    /// token, an explicit rejection, or any transport/parse error it
    /// clears all cached session state and returns false.
    pub async fn is_authenticated(&self) -> bool {
        let token = match self.access_token() {
            Some(token) => token,
            None => return false,
        };

        let url = format!("{}/auth/verify", self.url);
        let result = Fetch::post(&self.http_client, &url)
            .bearer_auth(&token)
            .execute::<VerifyResponse>()
            .await;

        match result {
            Ok(response) if response.success => true,
            Ok(_) => {
                warn!("access token rejected, clearing session");
                self.logout();
                false
            }
            Err(e) => {
                warn!("session verification failed ({}), clearing session", e);
                self.logout();
                false
            }
        }
    }

    /// Clear all cached session state, synchronously and unconditionally
    pub fn logout(&self) {
        *self.session.write().unwrap() = None;
    }

    /// The cached profile of the authenticated user.
    ///
    /// Before any successful login or verify this returns the empty
    /// sentinel user: no identity, no authorities. Callers must not
    /// treat the sentinel as a valid identity for security decisions;
    /// every authority check against it returns false.
    pub fn current_user(&self) -> UserResponse {
        self.session
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.user.clone())
            .unwrap_or_else(UserResponse::empty)
    }

    /// The cached session, if any
    pub fn session(&self) -> Option<Session> {
        self.session.read().unwrap().clone()
    }

    /// The cached access token, if any
    pub fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// True iff the current user's role holds the given authority
    pub fn has_authority(&self, authority: Authority) -> bool {
        self.current_user().role.has_authority(authority)
    }

    /// True iff the current user's role holds at least one of the given
    /// authorities
    pub fn has_any_authority(&self, authorities: &[Authority]) -> bool {
        self.current_user().role.has_any_authority(authorities)
    }

    /// The owner-override check: the creator of a resource keeps its
    /// affordances regardless of role.
    pub fn is_owner_or_has_authority(&self, owner_email: &str, authority: Authority) -> bool {
        let user = self.current_user();
        if !user.email.is_empty() && user.email == owner_email {
            return true;
        }
        user.role.has_authority(authority)
    }

    /// Access token for a request that requires an active session
    pub(crate) fn require_token(&self) -> Result<String, Error> {
        self.access_token()
            .ok_or_else(|| Error::auth("no active session"))
    }

    async fn fetch_principal(&self, access_token: &str) -> Result<UserResponse, Error> {
        let url = format!("{}/users/principal", self.url);
        Fetch::get(&self.http_client, &url)
            .bearer_auth(access_token)
            .execute()
            .await
    }
}
