//! Ticket comments and the activity trail
//!
//! Activities are append-only from the client's perspective; COMMENT
//! entries may additionally be edited or deleted by their author.

use reqwest::Client;
use serde_json::Value;

use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::model::{ActivityResponse, CommentRequest};

/// Client for comment and activity operations
pub struct CommentsClient {
    base_url: String,
    http_client: Client,
    auth: Auth,
}

impl CommentsClient {
    pub(crate) fn new(base_url: &str, http_client: Client, auth: Auth) -> Self {
        Self {
            base_url: base_url.to_string(),
            http_client,
            auth,
        }
    }

    /// Fetch a ticket's activity trail
    pub async fn activities(&self, ticket_id: i64) -> Result<Vec<ActivityResponse>, Error> {
        let token = self.auth.require_token()?;
        Fetch::get(
            &self.http_client,
            &format!("{}/activities/{}", self.base_url, ticket_id),
        )
        .bearer_auth(&token)
        .execute()
        .await
    }

    /// Post a comment on a ticket
    pub async fn create(&self, request: &CommentRequest) -> Result<ActivityResponse, Error> {
        let token = self.auth.require_token()?;
        Fetch::post(&self.http_client, &format!("{}/comments", self.base_url))
            .bearer_auth(&token)
            .json(request)?
            .execute()
            .await
    }

    /// Edit an existing comment
    pub async fn update(&self, id: i64, request: &CommentRequest) -> Result<ActivityResponse, Error> {
        let token = self.auth.require_token()?;
        Fetch::patch(
            &self.http_client,
            &format!("{}/comments/{}", self.base_url, id),
        )
        .bearer_auth(&token)
        .json(request)?
        .execute()
        .await
    }

    /// Delete a comment
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let token = self.auth.require_token()?;
        let _: Value = Fetch::delete(
            &self.http_client,
            &format!("{}/comments/{}", self.base_url, id),
        )
        .bearer_auth(&token)
        .execute()
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityType, AuthRequest};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn authed_client(server: &MockServer) -> CommentsClient {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "firstname": "Maya",
                "email": "maya@example.com",
                "accessToken": "access-1",
                "refreshToken": "refresh-1",
                "role": {"id": 1, "role": "SUPPORT", "authorities": []}
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/principal"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "firstname": "Maya",
                "email": "maya@example.com",
                "role": {"id": 1, "role": "SUPPORT", "authorities": []},
                "editable": true,
                "deletable": false
            })))
            .mount(server)
            .await;

        let auth = Auth::new(&server.uri(), Client::new());
        auth.login(&AuthRequest::new("maya@example.com", "s3cret"))
            .await
            .unwrap();

        CommentsClient::new(&server.uri(), Client::new(), auth)
    }

    #[tokio::test]
    async fn create_posts_comment_payload() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("POST"))
            .and(path("/comments"))
            .and(body_string_contains("Looking into it"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 12,
                "type": "COMMENT",
                "author": "Maya",
                "message": "Looking into it",
                "createdAt": "2025-03-02T11:00:00Z",
                "lastUpdated": "2025-03-02T11:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let activity = client
            .create(&CommentRequest::new(4, "Looking into it"))
            .await
            .unwrap();
        assert_eq!(activity.activity_type, ActivityType::Comment);
        assert_eq!(activity.id, 12);
    }

    #[tokio::test]
    async fn activities_lists_the_trail() {
        let server = MockServer::start().await;
        let client = authed_client(&server).await;

        Mock::given(method("GET"))
            .and(path("/activities/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": 1,
                    "type": "EDIT",
                    "author": "Maya",
                    "message": "Priority changed to HIGH",
                    "createdAt": "2025-03-02T10:30:00Z",
                    "lastUpdated": "2025-03-02T10:30:00Z"
                }
            ])))
            .mount(&server)
            .await;

        let trail = client.activities(4).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].activity_type, ActivityType::Edit);
    }
}
