//! User management operations

use std::sync::Arc;

use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::alert::AlertChannel;
use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::model::{Page, PatchUserRequest, ResetPasswordRequest, UserResponse};
use crate::pager::Pager;
use crate::store::AppState;

#[derive(Debug, Deserialize)]
struct UserCount {
    user_count: i64,
}

/// Client for user management operations
pub struct UsersClient {
    url: String,
    http_client: Client,
    auth: Auth,
    state: Arc<AppState>,
    alerts: AlertChannel,
}

impl UsersClient {
    pub(crate) fn new(
        base_url: &str,
        http_client: Client,
        auth: Auth,
        state: Arc<AppState>,
        alerts: AlertChannel,
    ) -> Self {
        Self {
            url: format!("{}/users", base_url),
            http_client,
            auth,
            state,
            alerts,
        }
    }

    /// Fetch the total user count into the store
    pub async fn load_count(&self) -> Result<i64, Error> {
        let token = self.auth.require_token()?;
        let count: UserCount = Fetch::get(&self.http_client, &format!("{}/count", self.url))
            .bearer_auth(&token)
            .execute()
            .await?;

        self.state.users.set_count(count.user_count);
        Ok(count.user_count)
    }

    /// Fetch one page of users into the store
    pub async fn load_page(&self, pager: &mut Pager) -> Result<Vec<UserResponse>, Error> {
        let token = self.auth.require_token()?;
        let ticket = pager.begin();

        let page: Page<UserResponse> = Fetch::get(&self.http_client, &self.url)
            .bearer_auth(&token)
            .paged(pager.page(), pager.size())
            .execute()
            .await?;

        if pager.apply(ticket, &page) {
            self.state.users.set_all(page.content.clone());
        } else {
            debug!("discarding stale user page (seq {})", ticket);
        }
        Ok(page.content)
    }

    /// Fetch the authenticated user's own profile
    pub async fn principal(&self) -> Result<UserResponse, Error> {
        let token = self.auth.require_token()?;
        Fetch::get(&self.http_client, &format!("{}/principal", self.url))
            .bearer_auth(&token)
            .execute()
            .await
    }

    /// Patch a user record
    pub async fn update(
        &self,
        email: &str,
        request: &PatchUserRequest,
    ) -> Result<UserResponse, Error> {
        let token = self.auth.require_token()?;

        let result: Result<UserResponse, Error> =
            Fetch::patch(&self.http_client, &format!("{}/{}", self.url, email))
                .bearer_auth(&token)
                .json(request)?
                .execute()
                .await;

        match result {
            Ok(user) => {
                self.alerts
                    .info("User updated", &format!("User {} updated", user.firstname));
                Ok(user)
            }
            Err(e) => {
                self.report_failure("User not updated", &e);
                Err(e)
            }
        }
    }

    /// Reset a user's password
    pub async fn reset_password(
        &self,
        email: &str,
        request: &ResetPasswordRequest,
    ) -> Result<(), Error> {
        request.validate()?;
        let token = self.auth.require_token()?;

        let result = Fetch::patch(
            &self.http_client,
            &format!("{}/reset-password/{}", self.url, email),
        )
        .bearer_auth(&token)
        .json(request)?
        .execute_empty()
        .await;

        match result {
            Ok(()) => {
                self.alerts
                    .info("Password reset", &format!("Password reset for {}", email));
                Ok(())
            }
            Err(e) => {
                self.report_failure("Password not reset", &e);
                Err(e)
            }
        }
    }

    /// Delete a user and drop them from the store.
    ///
    /// Authorization is the backend's call: a request from a caller
    /// without `user::delete` is rejected there, and a rejected delete
    /// leaves the store unchanged.
    pub async fn delete(&self, user: &UserResponse) -> Result<(), Error> {
        let token = self.auth.require_token()?;

        let result: Result<Value, Error> =
            Fetch::delete(&self.http_client, &format!("{}/{}", self.url, user.email))
                .bearer_auth(&token)
                .execute()
                .await;

        match result {
            Ok(_) => {
                self.state.users.remove_one(&user.email);
                self.state.users.adjust_count(-1);
                self.alerts.info(
                    "User deleted",
                    &format!("User with name {} deleted", user.firstname),
                );
                Ok(())
            }
            Err(e) => {
                self.report_failure("User not deleted", &e);
                Err(e)
            }
        }
    }

    fn report_failure(&self, title: &str, error: &Error) {
        let message = error
            .server_message()
            .unwrap_or("Something went wrong, try again");
        self.alerts.fail(title, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertKind, AuthRequest, Role};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_body(firstname: &str, email: &str, deletable: bool) -> serde_json::Value {
        json!({
            "firstname": firstname,
            "email": email,
            "role": {"id": 2, "role": "SUPPORT", "authorities": []},
            "editable": true,
            "deletable": deletable
        })
    }

    async fn authed_client(server: &MockServer) -> UsersClient {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "firstname": "Maya",
                "email": "maya@example.com",
                "accessToken": "access-1",
                "refreshToken": "refresh-1",
                "role": {"id": 1, "role": "ADMIN", "authorities": ["user::delete"]}
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/principal"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_body("Maya", "maya@example.com", false)),
            )
            .mount(server)
            .await;

        let auth = Auth::new(&server.uri(), Client::new());
        auth.login(&AuthRequest::new("maya@example.com", "s3cret"))
            .await
            .unwrap();

        UsersClient::new(
            &server.uri(),
            Client::new(),
            auth,
            Arc::new(AppState::new()),
            AlertChannel::new(Duration::from_millis(4000)),
        )
    }

    fn stored_user(firstname: &str, email: &str, deletable: bool) -> UserResponse {
        UserResponse {
            firstname: firstname.to_string(),
            email: email.to_string(),
            role: Role::empty(),
            editable: true,
            deletable,
        }
    }

    #[tokio::test]
    async fn load_count_feeds_the_store() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/users/count"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_count": 23})))
            .mount(&server)
            .await;

        assert_eq!(client.load_count().await.unwrap(), 23);
        assert_eq!(client.state.users.count(), 23);
    }

    #[tokio::test]
    async fn delete_removes_by_email() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/users/sam@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let sam = stored_user("Sam", "sam@example.com", true);
        client.state.users.set_all(vec![
            sam.clone(),
            stored_user("Ana", "ana@example.com", true),
        ]);
        client.state.users.set_count(2);

        client.delete(&sam).await.unwrap();

        assert_eq!(client.state.users.len(), 1);
        assert_eq!(client.state.users.count(), 1);
        assert!(client.state.users.find(&"sam@example.com".to_string()).is_none());
        assert_eq!(client.alerts.current().unwrap().kind, AlertKind::Info);
    }

    #[tokio::test]
    async fn rejected_delete_leaves_store_unchanged() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        // The backend is the enforcement authority: it rejects the
        // delete of a non-deletable user no matter what was invoked
        // client-side.
        Mock::given(method("DELETE"))
            .and(path("/users/root@example.com"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({"message": "user is protected"})),
            )
            .mount(&server)
            .await;

        let root = stored_user("Root", "root@example.com", false);
        client.state.users.set_all(vec![root.clone()]);
        client.state.users.set_count(1);

        let err = client.delete(&root).await.unwrap_err();
        assert_eq!(err.server_message(), Some("user is protected"));
        assert_eq!(client.state.users.len(), 1);
        assert_eq!(client.state.users.count(), 1);
        assert_eq!(client.alerts.current().unwrap().kind, AlertKind::Fail);
    }

    #[tokio::test]
    async fn reset_password_validates_inline() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("PATCH"))
            .and(path("/users/reset-password/sam@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(0)
            .mount(&server)
            .await;

        let mismatched = ResetPasswordRequest::new("one", "two");
        let err = client
            .reset_password("sam@example.com", &mismatched)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // Validation failures surface inline, never via the alert banner.
        assert!(client.alerts.current().is_none());
    }
}
