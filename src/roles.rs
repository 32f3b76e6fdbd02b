//! Role management operations

use std::sync::Arc;

use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::alert::AlertChannel;
use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::model::{Page, Role, RoleRequest};
use crate::pager::Pager;
use crate::store::AppState;

/// Client for role management operations
pub struct RolesClient {
    url: String,
    http_client: Client,
    auth: Auth,
    state: Arc<AppState>,
    alerts: AlertChannel,
}

impl RolesClient {
    pub(crate) fn new(
        base_url: &str,
        http_client: Client,
        auth: Auth,
        state: Arc<AppState>,
        alerts: AlertChannel,
    ) -> Self {
        Self {
            url: format!("{}/roles", base_url),
            http_client,
            auth,
            state,
            alerts,
        }
    }

    /// Fetch one page of roles into the store
    pub async fn load_page(&self, pager: &mut Pager) -> Result<Vec<Role>, Error> {
        let token = self.auth.require_token()?;
        let ticket = pager.begin();

        let page: Page<Role> = Fetch::get(&self.http_client, &self.url)
            .bearer_auth(&token)
            .paged(pager.page(), pager.size())
            .execute()
            .await?;

        if pager.apply(ticket, &page) {
            self.state.roles.set_all(page.content.clone());
            self.state.roles.set_count(page.total_element);
        } else {
            debug!("discarding stale role page (seq {})", ticket);
        }
        Ok(page.content)
    }

    /// Fetch a single role
    pub async fn get(&self, id: i64) -> Result<Role, Error> {
        let token = self.auth.require_token()?;
        Fetch::get(&self.http_client, &format!("{}/{}", self.url, id))
            .bearer_auth(&token)
            .execute()
            .await
    }

    /// Create a role and prepend it to the store
    pub async fn create(&self, request: &RoleRequest) -> Result<Role, Error> {
        let token = self.auth.require_token()?;

        let result: Result<Role, Error> = Fetch::post(&self.http_client, &self.url)
            .bearer_auth(&token)
            .json(request)?
            .execute()
            .await;

        match result {
            Ok(role) => {
                self.state.roles.add_one(role.clone());
                self.state.roles.adjust_count(1);
                self.alerts
                    .info("Role created", &format!("Role {} created", role.role));
                Ok(role)
            }
            Err(e) => {
                self.report_failure("Role not created", &e);
                Err(e)
            }
        }
    }

    /// Patch a role's name or authorities
    pub async fn update(&self, id: i64, request: &RoleRequest) -> Result<Role, Error> {
        let token = self.auth.require_token()?;

        let result: Result<Role, Error> =
            Fetch::patch(&self.http_client, &format!("{}/{}", self.url, id))
                .bearer_auth(&token)
                .json(request)?
                .execute()
                .await;

        match result {
            Ok(role) => {
                self.alerts
                    .info("Role updated", &format!("Role {} updated", role.role));
                Ok(role)
            }
            Err(e) => {
                self.report_failure("Role not updated", &e);
                Err(e)
            }
        }
    }

    /// Delete a role, moving its members to the replacement role
    pub async fn delete(&self, id: i64, replacement: i64) -> Result<(), Error> {
        let token = self.auth.require_token()?;

        let result: Result<Value, Error> = Fetch::delete(
            &self.http_client,
            &format!("{}/{}/update-to/{}", self.url, id, replacement),
        )
        .bearer_auth(&token)
        .execute()
        .await;

        match result {
            Ok(_) => {
                self.state.roles.remove_one(&id);
                self.state.roles.adjust_count(-1);
                self.alerts.info("Role deleted", "Role deleted");
                Ok(())
            }
            Err(e) => {
                self.report_failure("Role not deleted", &e);
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
    use crate::model::{AuthRequest, Authority};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn authed_client(server: &MockServer) -> RolesClient {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "firstname": "Maya",
                "email": "maya@example.com",
                "accessToken": "access-1",
                "refreshToken": "refresh-1",
                "role": {"id": 1, "role": "ADMIN", "authorities": ["role::create", "role::delete"]}
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/principal"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "firstname": "Maya",
                "email": "maya@example.com",
                "role": {"id": 1, "role": "ADMIN", "authorities": ["role::create", "role::delete"]},
                "editable": true,
                "deletable": false
            })))
            .mount(server)
            .await;

        let auth = Auth::new(&server.uri(), Client::new());
        auth.login(&AuthRequest::new("maya@example.com", "s3cret"))
            .await
            .unwrap();

        RolesClient::new(
            &server.uri(),
            Client::new(),
            auth,
            Arc::new(AppState::new()),
            AlertChannel::new(Duration::from_millis(4000)),
        )
    }

    #[tokio::test]
    async fn create_prepends_and_counts() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("POST"))
            .and(path("/roles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 9,
                "role": "HELPDESK",
                "editable": true,
                "deletable": true,
                "authorities": ["ticket::create", "ticket::edit"]
            })))
            .mount(&server)
            .await;

        let request = RoleRequest::new(
            "HELPDESK",
            vec![Authority::TicketCreate, Authority::TicketEdit],
        );
        let role = client.create(&request).await.unwrap();

        assert_eq!(role.id, 9);
        assert_eq!(client.state.roles.items().first().unwrap().role, "HELPDESK");
        assert_eq!(client.state.roles.count(), 1);
    }

    #[tokio::test]
    async fn delete_uses_replacement_path() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("DELETE"))
            .and(path("/roles/9/update-to/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let role: Role = serde_json::from_value(json!({
            "id": 9, "role": "HELPDESK", "authorities": []
        }))
        .unwrap();
        client.state.roles.set_all(vec![role]);
        client.state.roles.set_count(3);

        client.delete(9, 2).await.unwrap();
        assert!(client.state.roles.is_empty());
        assert_eq!(client.state.roles.count(), 2);
    }

    #[tokio::test]
    async fn load_page_sets_total_from_server() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/roles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"id": 1, "role": "ADMIN", "authorities": []}],
                "next": false,
                "previous": false,
                "totalElement": 4
            })))
            .mount(&server)
            .await;

        let mut pager = Pager::new(10);
        client.load_page(&mut pager).await.unwrap();
        assert_eq!(client.state.roles.len(), 1);
        assert_eq!(client.state.roles.count(), 4);
    }
}
