//! Client-company management operations

use std::sync::Arc;

use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::alert::AlertChannel;
use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::model::{ClientRequest, ClientResponse, Page};
use crate::pager::Pager;
use crate::store::AppState;

/// Client for client-company operations
pub struct ClientsClient {
    url: String,
    http_client: Client,
    auth: Auth,
    state: Arc<AppState>,
    alerts: AlertChannel,
}

impl ClientsClient {
    pub(crate) fn new(
        base_url: &str,
        http_client: Client,
        auth: Auth,
        state: Arc<AppState>,
        alerts: AlertChannel,
    ) -> Self {
        Self {
            url: format!("{}/clients", base_url),
            http_client,
            auth,
            state,
            alerts,
        }
    }

    /// Fetch one page of clients into the store
    pub async fn load_page(&self, pager: &mut Pager) -> Result<Vec<ClientResponse>, Error> {
        let token = self.auth.require_token()?;
        let ticket = pager.begin();

        let page: Page<ClientResponse> = Fetch::get(&self.http_client, &self.url)
            .bearer_auth(&token)
            .paged(pager.page(), pager.size())
            .execute()
            .await?;

        if pager.apply(ticket, &page) {
            self.state.clients.set_all(page.content.clone());
            self.state.clients.set_count(page.total_element);
        } else {
            debug!("discarding stale client page (seq {})", ticket);
        }
        Ok(page.content)
    }

    /// Create a client and prepend it to the store
    pub async fn create(&self, request: &ClientRequest) -> Result<ClientResponse, Error> {
        request.validate()?;
        let token = self.auth.require_token()?;

        let result: Result<ClientResponse, Error> = Fetch::post(&self.http_client, &self.url)
            .bearer_auth(&token)
            .json(request)?
            .execute()
            .await;

        match result {
            Ok(client) => {
                self.state.clients.add_one(client.clone());
                self.state.clients.adjust_count(1);
                self.alerts
                    .info("Client created", &format!("Client {} created", client.name));
                Ok(client)
            }
            Err(e) => {
                self.report_failure("Client not created", &e);
                Err(e)
            }
        }
    }

    /// Replace a client record
    pub async fn update(&self, id: i64, request: &ClientRequest) -> Result<ClientResponse, Error> {
        request.validate()?;
        let token = self.auth.require_token()?;

        let result: Result<ClientResponse, Error> =
            Fetch::put(&self.http_client, &format!("{}/{}", self.url, id))
                .bearer_auth(&token)
                .json(request)?
                .execute()
                .await;

        match result {
            Ok(client) => {
                self.alerts
                    .info("Client updated", &format!("Client {} updated", client.name));
                Ok(client)
            }
            Err(e) => {
                self.report_failure("Client not updated", &e);
                Err(e)
            }
        }
    }

    /// Delete a client and drop it from the store
    pub async fn delete(&self, client: &ClientResponse) -> Result<(), Error> {
        let token = self.auth.require_token()?;

        let result: Result<Value, Error> =
            Fetch::delete(&self.http_client, &format!("{}/{}", self.url, client.id))
                .bearer_auth(&token)
                .execute()
                .await;

        match result {
            Ok(_) => {
                self.state.clients.remove_one(&client.id);
                self.state.clients.adjust_count(-1);
                self.alerts
                    .info("Client deleted", &format!("Client {} deleted", client.name));
                Ok(())
            }
            Err(e) => {
                self.report_failure("Client not deleted", &e);
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
