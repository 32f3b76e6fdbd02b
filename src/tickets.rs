//! Ticket operations
//!
//! Wraps the `/tickets` endpoints and applies the store and alert
//! consequences of each call. Failed requests never touch the store;
//! they surface through the alert channel with the server-provided
//! message when one is available.

use std::sync::Arc;

use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::alert::AlertChannel;
use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::model::{Page, PatchTicketRequest, Status, TicketInfo, TicketRequest, TicketResponse};
use crate::pager::Pager;
use crate::store::AppState;

/// Client for ticket operations
pub struct TicketsClient {
    url: String,
    http_client: Client,
    auth: Auth,
    state: Arc<AppState>,
    alerts: AlertChannel,
}

impl TicketsClient {
    pub(crate) fn new(
        base_url: &str,
        http_client: Client,
        auth: Auth,
        state: Arc<AppState>,
        alerts: AlertChannel,
    ) -> Self {
        Self {
            url: format!("{}/tickets", base_url),
            http_client,
            auth,
            state,
            alerts,
        }
    }

    /// Fetch the open/close/total tallies and store them for the
    /// dashboard
    pub async fn load_info(&self) -> Result<TicketInfo, Error> {
        let token = self.auth.require_token()?;
        let info: TicketInfo = Fetch::get(&self.http_client, &format!("{}/info", self.url))
            .bearer_auth(&token)
            .execute()
            .await?;

        self.state.ticket_counts.set_open(info.open_count);
        self.state.ticket_counts.set_close(info.close_count);
        self.state.tickets.set_count(info.total_count);
        Ok(info)
    }

    /// Fetch one page of tickets.
    ///
    /// The store is replaced only while the response is still the newest
    /// one for this pager; a stale page is discarded.
    pub async fn load_page(&self, pager: &mut Pager) -> Result<Vec<TicketResponse>, Error> {
        let url = self.url.clone();
        self.fetch_page(&url, pager).await
    }

    /// Fetch one page of tickets filtered by status.
    ///
    /// Callers switching filters must `pager.reset()` first so the new
    /// filter starts from page 0.
    pub async fn load_page_by_status(
        &self,
        status: Status,
        pager: &mut Pager,
    ) -> Result<Vec<TicketResponse>, Error> {
        let url = format!("{}/status/{}", self.url, status.as_str());
        self.fetch_page(&url, pager).await
    }

    /// Fetch a single ticket for the detail view
    pub async fn get(&self, id: i64) -> Result<TicketResponse, Error> {
        let token = self.auth.require_token()?;
        Fetch::get(&self.http_client, &format!("{}/{}", self.url, id))
            .bearer_auth(&token)
            .execute()
            .await
    }

    /// Create a ticket. On success the new ticket lands at the head of
    /// the store, the counters move, and an info alert names the new id.
    pub async fn create(&self, request: &TicketRequest) -> Result<TicketResponse, Error> {
        request.validate()?;
        let token = self.auth.require_token()?;

        let result: Result<TicketResponse, Error> = Fetch::post(&self.http_client, &self.url)
            .bearer_auth(&token)
            .json(request)?
            .execute()
            .await;

        match result {
            Ok(ticket) => {
                self.state.tickets.add_one(ticket.clone());
                self.state.tickets.adjust_count(1);
                match ticket.status {
                    Status::Open => self.state.ticket_counts.adjust_open(1),
                    Status::Close => self.state.ticket_counts.adjust_close(1),
                }
                self.alerts
                    .info("Ticket created", &format!("Ticket #{} created", ticket.id));
                Ok(ticket)
            }
            Err(e) => {
                self.report_failure("Ticket not created", &e);
                Err(e)
            }
        }
    }

    /// Patch a ticket.
    ///
    /// A locked ticket refuses assignment, priority, and client changes
    /// before any request is issued, regardless of the caller's
    /// authorities; the server stays authoritative for everything that
    /// does go out.
    pub async fn update(
        &self,
        current: &TicketResponse,
        request: &PatchTicketRequest,
    ) -> Result<TicketResponse, Error> {
        if current.lock && request.touches_locked_fields() {
            debug!("refusing patch of locked ticket {}", current.id);
            return Err(Error::TicketLocked(current.id));
        }
        let token = self.auth.require_token()?;

        let result: Result<TicketResponse, Error> =
            Fetch::patch(&self.http_client, &format!("{}/{}", self.url, current.id))
                .bearer_auth(&token)
                .json(request)?
                .execute()
                .await;

        match result {
            Ok(ticket) => {
                self.alerts
                    .info("Ticket updated", &format!("Ticket #{} updated", ticket.id));
                Ok(ticket)
            }
            Err(e) => {
                self.report_failure("Ticket not updated", &e);
                Err(e)
            }
        }
    }

    /// Lock a ticket against further mutation
    pub async fn lock(&self, id: i64) -> Result<TicketResponse, Error> {
        self.toggle_lock("lock", id).await
    }

    /// Release a ticket's lock
    pub async fn unlock(&self, id: i64) -> Result<TicketResponse, Error> {
        self.toggle_lock("unlock", id).await
    }

    /// Delete a ticket and drop it from the store
    pub async fn delete(&self, ticket: &TicketResponse) -> Result<(), Error> {
        let token = self.auth.require_token()?;

        let result: Result<Value, Error> =
            Fetch::delete(&self.http_client, &format!("{}/{}", self.url, ticket.id))
                .bearer_auth(&token)
                .execute()
                .await;

        match result {
            Ok(_) => {
                self.state.tickets.remove_one(&ticket.id);
                self.state.tickets.adjust_count(-1);
                match ticket.status {
                    Status::Open => self.state.ticket_counts.adjust_open(-1),
                    Status::Close => self.state.ticket_counts.adjust_close(-1),
                }
                self.alerts
                    .info("Ticket deleted", &format!("Ticket #{} deleted", ticket.id));
                Ok(())
            }
            Err(e) => {
                self.report_failure("Ticket not deleted", &e);
                Err(e)
            }
        }
    }

    async fn toggle_lock(&self, action: &str, id: i64) -> Result<TicketResponse, Error> {
        let token = self.auth.require_token()?;

        let result: Result<TicketResponse, Error> =
            Fetch::patch(&self.http_client, &format!("{}/{}/{}", self.url, action, id))
                .bearer_auth(&token)
                .execute()
                .await;

        match result {
            Ok(ticket) => {
                let state = if ticket.lock { "locked" } else { "unlocked" };
                self.alerts
                    .info("Ticket", &format!("Ticket #{} {}", ticket.id, state));
                Ok(ticket)
            }
            Err(e) => {
                self.report_failure("Ticket", &e);
                Err(e)
            }
        }
    }

    async fn fetch_page(
        &self,
        url: &str,
        pager: &mut Pager,
    ) -> Result<Vec<TicketResponse>, Error> {
        let token = self.auth.require_token()?;
        let ticket = pager.begin();

        let page: Page<TicketResponse> = Fetch::get(&self.http_client, url)
            .bearer_auth(&token)
            .paged(pager.page(), pager.size())
            .execute()
            .await?;

        if pager.apply(ticket, &page) {
            self.state.tickets.set_all(page.content.clone());
        } else {
            debug!("discarding stale ticket page (seq {})", ticket);
        }
        Ok(page.content)
    }

    fn report_failure(&self, title: &str, error: &Error) {
        let message = error
            .server_message()
            .unwrap_or("Something went wrong, try again");
        self.alerts.fail(title, message);
    }
}
