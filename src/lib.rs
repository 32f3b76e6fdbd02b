//! Latte Rust Client Library
//!
//! A Rust client library for the Latte helpdesk backend: authentication
//! and session caching, typed resource clients with client-side stores,
//! permission predicates, pagination, a transient alert channel, and a
//! live websocket notification feed.

pub mod alert;
pub mod auth;
pub mod clients;
pub mod comments;
pub mod config;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod model;
pub mod notifications;
pub mod pager;
pub mod realtime;
pub mod roles;
pub mod store;
pub mod tickets;
pub mod users;

use std::sync::Arc;

use reqwest::Client;

use crate::alert::AlertChannel;
use crate::auth::Auth;
use crate::clients::ClientsClient;
use crate::comments::CommentsClient;
use crate::config::ClientOptions;
use crate::guard::{GuardState, Splash};
use crate::notifications::NotificationsClient;
use crate::realtime::NotificationFeed;
use crate::roles::RolesClient;
use crate::store::AppState;
use crate::tickets::TicketsClient;
use crate::users::UsersClient;

/// The main entry point for the Latte client.
///
/// Owns the shared HTTP client, the cached session, every resource
/// store, the alert channel, and the notification feed. Construct one
/// at startup and pass it (or the handles it returns) to views; call
/// [`Latte::sign_out`] to tear the session and all cached state down.
pub struct Latte {
    /// The REST API endpoint, e.g. `https://latte.example.com/api/v1`
    pub url: String,
    /// The websocket endpoint for the notification feed
    pub ws_url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    auth: Auth,
    state: Arc<AppState>,
    alerts: AlertChannel,
    splash: Splash,
    feed: NotificationFeed,
}

impl Latte {
    /// Create a new Latte client
    ///
    /// # Example
    ///
    /// ```
    /// use latte_client::Latte;
    ///
    /// let latte = Latte::new("https://latte.example.com/api/v1", "wss://latte.example.com/ws");
    /// ```
    pub fn new(api_endpoint: &str, ws_endpoint: &str) -> Self {
        Self::new_with_options(api_endpoint, ws_endpoint, ClientOptions::default())
    }

    /// Create a new Latte client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use latte_client::{config::ClientOptions, Latte};
    ///
    /// let options = ClientOptions::default().with_page_size(25);
    /// let latte = Latte::new_with_options(
    ///     "https://latte.example.com/api/v1",
    ///     "wss://latte.example.com/ws",
    ///     options,
    /// );
    /// ```
    pub fn new_with_options(api_endpoint: &str, ws_endpoint: &str, options: ClientOptions) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_default();

        let auth = Auth::new(api_endpoint, http_client.clone());
        let state = Arc::new(AppState::new());
        let alerts = AlertChannel::new(options.alert_dismiss_after);
        let splash = Splash::new();
        let feed = NotificationFeed::new_with_options(
            ws_endpoint,
            auth.clone(),
            state.clone(),
            alerts.clone(),
            options.feed.clone(),
        );

        Self {
            url: api_endpoint.to_string(),
            ws_url: ws_endpoint.to_string(),
            http_client,
            options,
            auth,
            state,
            alerts,
            splash,
            feed,
        }
    }

    /// The auth client for login, verification, and permission checks
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The application-state container holding every resource store
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// The global alert banner channel
    pub fn alerts(&self) -> &AlertChannel {
        &self.alerts
    }

    /// The splash indicator shown while the route guard runs
    pub fn splash(&self) -> &Splash {
        &self.splash
    }

    /// The live notification feed
    pub fn feed(&self) -> &NotificationFeed {
        &self.feed
    }

    /// A client for ticket operations
    pub fn tickets(&self) -> TicketsClient {
        TicketsClient::new(
            &self.url,
            self.http_client.clone(),
            self.auth.clone(),
            self.state.clone(),
            self.alerts.clone(),
        )
    }

    /// A client for user management operations
    pub fn users(&self) -> UsersClient {
        UsersClient::new(
            &self.url,
            self.http_client.clone(),
            self.auth.clone(),
            self.state.clone(),
            self.alerts.clone(),
        )
    }

    /// A client for role management operations
    pub fn roles(&self) -> RolesClient {
        RolesClient::new(
            &self.url,
            self.http_client.clone(),
            self.auth.clone(),
            self.state.clone(),
            self.alerts.clone(),
        )
    }

    /// A client for client-company operations
    pub fn clients(&self) -> ClientsClient {
        ClientsClient::new(
            &self.url,
            self.http_client.clone(),
            self.auth.clone(),
            self.state.clone(),
            self.alerts.clone(),
        )
    }

    /// A client for the notification list
    pub fn notifications(&self) -> NotificationsClient {
        NotificationsClient::new(
            &self.url,
            self.http_client.clone(),
            self.auth.clone(),
            self.state.clone(),
        )
    }

    /// A client for comments and activity trails
    pub fn comments(&self) -> CommentsClient {
        CommentsClient::new(&self.url, self.http_client.clone(), self.auth.clone())
    }

    /// A default pagination cursor using the configured page size
    pub fn pager(&self) -> pager::Pager {
        pager::Pager::new(self.options.page_size)
    }

    /// Run the route guard for a protected navigation
    pub async fn authorize(&self) -> GuardState {
        guard::authorize(&self.auth, &self.splash).await
    }

    /// Tear down the session: close the feed, clear the cached session,
    /// drop every store, and dismiss any visible alert
    pub async fn sign_out(&self) {
        self.feed.disconnect().await;
        self.auth.logout();
        self.state.reset();
        self.alerts.dismiss();
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::alert::AlertChannel;
    pub use crate::auth::Auth;
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::guard::GuardState;
    pub use crate::model::{
        Alert, AlertKind, AuthRequest, Authority, Page, PatchTicketRequest, Priority, Status,
        TicketRequest, TicketResponse,
    };
    pub use crate::pager::Pager;
    pub use crate::realtime::{ConnectionState, FeedOptions};
    pub use crate::Latte;
}
