//! Configuration options for the Latte client

use std::time::Duration;

use crate::realtime::FeedOptions;

/// Configuration options for the Latte client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout applied to every HTTP call
    pub request_timeout: Option<Duration>,

    /// The default page size for paged list fetches
    pub page_size: u32,

    /// How long a published alert stays visible before auto-dismissing
    pub alert_dismiss_after: Duration,

    /// Notification feed connection and reconnect policy
    pub feed: FeedOptions,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            page_size: 10,
            alert_dismiss_after: Duration::from_millis(4000),
            feed: FeedOptions::default(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the default page size
    pub fn with_page_size(mut self, value: u32) -> Self {
        self.page_size = value;
        self
    }

    /// Set the alert auto-dismiss duration
    pub fn with_alert_dismiss_after(mut self, value: Duration) -> Self {
        self.alert_dismiss_after = value;
        self
    }

    /// Set the notification feed options
    pub fn with_feed(mut self, value: FeedOptions) -> Self {
        self.feed = value;
        self
    }
}
