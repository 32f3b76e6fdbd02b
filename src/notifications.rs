//! Notification list operations
//!
//! The REST side of notifications; live delivery happens over the
//! websocket feed in [`crate::realtime`].

use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;

use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::model::Notification;
use crate::store::AppState;

/// Client for notification list operations
pub struct NotificationsClient {
    url: String,
    http_client: Client,
    auth: Auth,
    state: Arc<AppState>,
}

impl NotificationsClient {
    pub(crate) fn new(
        base_url: &str,
        http_client: Client,
        auth: Auth,
        state: Arc<AppState>,
    ) -> Self {
        Self {
            url: format!("{}/notifications", base_url),
            http_client,
            auth,
            state,
        }
    }

    /// Fetch the notification list into the store.
    ///
    /// This is the "list view opened" operation: it also clears the
    /// unseen-notification badge.
    pub async fn load(&self) -> Result<Vec<Notification>, Error> {
        let token = self.auth.require_token()?;
        let notifications: Vec<Notification> = Fetch::get(&self.http_client, &self.url)
            .bearer_auth(&token)
            .execute()
            .await?;

        self.state.notifications.set_all(notifications.clone());
        self.state.clear_recent_notification();
        Ok(notifications)
    }

    /// Delete a notification and drop it from the store
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let _: Value = Fetch::delete(&self.http_client, &format!("{}/{}", self.url, id))
            .bearer_auth(&token)
            .execute()
            .await?;

        self.state.notifications.remove_one(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuthRequest;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn authed_client(server: &MockServer) -> NotificationsClient {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "firstname": "Maya",
                "email": "maya@example.com",
                "accessToken": "access-1",
                "refreshToken": "refresh-1",
                "role": {"id": 1, "role": "ADMIN", "authorities": []}
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/principal"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "firstname": "Maya",
                "email": "maya@example.com",
                "role": {"id": 1, "role": "ADMIN", "authorities": []},
                "editable": true,
                "deletable": false
            })))
            .mount(server)
            .await;

        let auth = Auth::new(&server.uri(), Client::new());
        auth.login(&AuthRequest::new("maya@example.com", "s3cret"))
            .await
            .unwrap();

        NotificationsClient::new(&server.uri(), Client::new(), auth, Arc::new(AppState::new()))
    }

    #[tokio::test]
    async fn load_fills_store_and_clears_badge() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "message": "Ticket #4 assigned to you", "createdAt": "2025-03-02T12:00:00Z"},
                {"id": 2, "message": "Ticket #5 closed", "createdAt": "2025-03-02T12:05:00Z"}
            ])))
            .mount(&server)
            .await;

        client.state.mark_recent_notification();
        let notifications = client.load().await.unwrap();

        assert_eq!(notifications.len(), 2);
        assert_eq!(client.state.notifications.len(), 2);
        assert!(!client.state.has_recent_notification());
    }

    #[tokio::test]
    async fn delete_removes_by_id() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "message": "one", "createdAt": "2025-03-02T12:00:00Z"},
                {"id": 2, "message": "two", "createdAt": "2025-03-02T12:05:00Z"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/notifications/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        client.load().await.unwrap();
        client.delete(1).await.unwrap();

        let items = client.state.notifications.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, 2);
    }
}
