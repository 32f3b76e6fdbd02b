//! Live notification feed
//!
//! Maintains one long-lived websocket connection to the backend's
//! per-user notification topic, authenticated with the current access
//! token at connect time. Pushed notifications are prepended to the
//! notification store, surfaced as an info alert, and raise the unseen
//! badge. Dropped connections are retried with jittered exponential
//! backoff; each attempt re-reads the freshest access token from the
//! shared session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, trace, warn};
use rand::Rng;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::alert::AlertChannel;
use crate::auth::Auth;
use crate::error::Error;
use crate::model::Notification;
use crate::store::AppState;

/// Connection lifecycle of the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Feed connection and reconnect policy
#[derive(Debug, Clone)]
pub struct FeedOptions {
    pub auto_reconnect: bool,
    pub max_reconnect_attempts: Option<u32>,
    /// Initial reconnect delay in milliseconds
    pub reconnect_interval: u64,
    pub reconnect_backoff_factor: f64,
    /// Ceiling for the backed-off delay in milliseconds
    pub max_reconnect_interval: u64,
    /// Keep-alive ping cadence in milliseconds
    pub ping_interval: u64,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            max_reconnect_attempts: None,
            reconnect_interval: 1000,
            reconnect_backoff_factor: 1.5,
            max_reconnect_interval: 30000,
            ping_interval: 30000,
        }
    }
}

/// Why a read loop ended
enum ReadEnd {
    /// Stream closed by the remote or errored; reconnect may follow
    Dropped,
    /// `disconnect()` was called; no reconnect
    Shutdown,
}

/// The live notification feed
pub struct NotificationFeed {
    url: String,
    auth: Auth,
    app: Arc<AppState>,
    alerts: AlertChannel,
    options: FeedOptions,
    connection_state: Arc<RwLock<ConnectionState>>,
    state_change: broadcast::Sender<ConnectionState>,
    is_manually_closed: Arc<AtomicBool>,
    shutdown: Arc<Mutex<watch::Sender<bool>>>,
}

impl NotificationFeed {
    /// Create a feed for the given websocket endpoint with default
    /// options
    pub fn new(url: &str, auth: Auth, app: Arc<AppState>, alerts: AlertChannel) -> Self {
        Self::new_with_options(url, auth, app, alerts, FeedOptions::default())
    }

    /// Create a feed with a custom connection policy
    pub fn new_with_options(
        url: &str,
        auth: Auth,
        app: Arc<AppState>,
        alerts: AlertChannel,
        options: FeedOptions,
    ) -> Self {
        let (state_change, _) = broadcast::channel(16);
        let (shutdown, _) = watch::channel(false);
        Self {
            url: url.to_string(),
            auth,
            app,
            alerts,
            options,
            connection_state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            state_change,
            is_manually_closed: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Mutex::new(shutdown)),
        }
    }

    /// Receive connection state transitions
    pub fn on_state_change(&self) -> broadcast::Receiver<ConnectionState> {
        self.state_change.subscribe()
    }

    /// The current connection state
    pub async fn connection_state(&self) -> ConnectionState {
        *self.connection_state.read().await
    }

    /// Open the feed and keep it open in a background task.
    ///
    /// The task authenticates with the access token cached at the time
    /// of each (re)connect attempt, so a token refreshed while the
    /// socket is up takes effect on the next reconnect cycle.
    pub fn connect(&self) {
        info!("connect() called for notification feed");
        self.is_manually_closed.store(false, Ordering::SeqCst);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        *self.shutdown.lock().unwrap() = shutdown_tx;

        let url = self.url.clone();
        let auth = self.auth.clone();
        let app = self.app.clone();
        let alerts = self.alerts.clone();
        let options = self.options.clone();
        let state_arc = self.connection_state.clone();
        let state_change = self.state_change.clone();
        let manual = self.is_manually_closed.clone();

        tokio::spawn(async move {
            Self::run(
                url,
                auth,
                app,
                alerts,
                options,
                state_arc,
                state_change,
                manual,
                shutdown_rx,
            )
            .await;
        });
    }

    /// Close the feed and stop reconnecting
    pub async fn disconnect(&self) {
        info!("disconnect() called for notification feed");
        self.is_manually_closed.store(true, Ordering::SeqCst);
        // Wakes both an open read loop and a pending backoff sleep.
        let _ = self.shutdown.lock().unwrap().send(true);
        Self::set_state(
            &self.connection_state,
            &self.state_change,
            ConnectionState::Disconnected,
        )
        .await;
    }

    #[allow(clippy::too_many_arguments)]
    async fn run(
        url: String,
        auth: Auth,
        app: Arc<AppState>,
        alerts: AlertChannel,
        options: FeedOptions,
        state_arc: Arc<RwLock<ConnectionState>>,
        state_change: broadcast::Sender<ConnectionState>,
        manual: Arc<AtomicBool>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut attempts: u32 = 0;
        let mut interval = options.reconnect_interval;

        loop {
            if manual.load(Ordering::SeqCst) {
                break;
            }

            let connecting = if attempts == 0 {
                ConnectionState::Connecting
            } else {
                ConnectionState::Reconnecting
            };
            Self::set_state(&state_arc, &state_change, connecting).await;

            let token = auth.access_token();
            match Self::open_socket(&url, token.as_deref()).await {
                Ok(ws_stream) => {
                    info!("notification feed connected");
                    Self::set_state(&state_arc, &state_change, ConnectionState::Connected).await;
                    attempts = 0;
                    interval = options.reconnect_interval;

                    let reason = Self::read_frames(
                        ws_stream,
                        &app,
                        &alerts,
                        &mut shutdown_rx,
                        options.ping_interval,
                    )
                    .await;

                    Self::set_state(&state_arc, &state_change, ConnectionState::Disconnected)
                        .await;

                    if matches!(reason, ReadEnd::Shutdown) || manual.load(Ordering::SeqCst) {
                        break;
                    }
                }
                Err(e) => {
                    warn!("notification feed connection failed: {}", e);
                    Self::set_state(&state_arc, &state_change, ConnectionState::Disconnected)
                        .await;
                }
            }

            if !options.auto_reconnect {
                break;
            }
            if let Some(max) = options.max_reconnect_attempts {
                if attempts >= max {
                    warn!("max reconnect attempts ({}) reached, giving up", max);
                    break;
                }
            }
            attempts += 1;

            let jitter = rand::thread_rng().gen_range(0..=interval / 4);
            let delay = Duration::from_millis(interval + jitter);
            debug!("reconnect attempt #{} in {:?}", attempts, delay);

            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown_rx.changed() => break,
            }

            interval = ((interval as f64 * options.reconnect_backoff_factor) as u64)
                .min(options.max_reconnect_interval);
        }

        debug!("notification feed task finished");
    }

    async fn open_socket(
        url: &str,
        token: Option<&str>,
    ) -> Result<WebSocketStream<MaybeTlsStream<TcpStream>>, Error> {
        let ws_url = format!("{}/notifications", url);
        let mut request = ws_url
            .as_str()
            .into_client_request()
            .map_err(Error::WebSocket)?;

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::realtime("access token is not a valid header value"))?;
            request.headers_mut().insert("Authorization", value);
        }

        debug!("opening websocket to {}", ws_url);
        let (ws_stream, _response) = connect_async(request).await?;
        Ok(ws_stream)
    }

    async fn read_frames(
        ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
        app: &Arc<AppState>,
        alerts: &AlertChannel,
        shutdown_rx: &mut watch::Receiver<bool>,
        ping_interval: u64,
    ) -> ReadEnd {
        let (mut write, mut read) = ws_stream.split();
        let mut ping = tokio::time::interval(Duration::from_millis(ping_interval));
        // The first tick fires immediately; consume it so pings start
        // one full interval after connect.
        ping.tick().await;

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        trace!("feed frame: {}", text);
                        match serde_json::from_str::<Notification>(&text) {
                            Ok(notification) => {
                                debug!("notification #{} received", notification.id);
                                app.notifications.add_one(notification.clone());
                                app.mark_recent_notification();
                                alerts.info("Notification", &notification.message);
                            }
                            Err(e) => {
                                error!("failed to parse notification: {}. raw: {}", e, text);
                            }
                        }
                    }
                    Some(Ok(msg)) if msg.is_close() => {
                        debug!("feed received close frame");
                        return ReadEnd::Dropped;
                    }
                    Some(Ok(_)) => {
                        // Ping/pong/binary frames carry nothing for us.
                    }
                    Some(Err(e)) => {
                        error!("feed read error: {}", e);
                        return ReadEnd::Dropped;
                    }
                    None => {
                        debug!("feed stream closed by remote");
                        return ReadEnd::Dropped;
                    }
                },

                _ = ping.tick() => {
                    trace!("feed sending keep-alive ping");
                    if let Err(e) = write.send(Message::Ping(Vec::new())).await {
                        error!("feed ping failed: {}, assuming connection lost", e);
                        return ReadEnd::Dropped;
                    }
                }

                _ = shutdown_rx.changed() => {
                    let _ = write.send(Message::Close(None)).await;
                    return ReadEnd::Shutdown;
                }
            }
        }
    }

    async fn set_state(
        state_arc: &Arc<RwLock<ConnectionState>>,
        state_change: &broadcast::Sender<ConnectionState>,
        state: ConnectionState,
    ) {
        let mut current = state_arc.write().await;
        if *current != state {
            debug!("feed state changing from {:?} to {:?}", *current, state);
            *current = state;
            // No receivers is fine; observers subscribe lazily.
            let _ = state_change.send(state);
        }
    }
}
