//! HTTP wrappers around the five backend endpoints.
//!
//! One rule everywhere: requests carry `Authorization: Bearer <token>`
//! unless they target login/register, and any 401 clears the session
//! before the error surfaces. No retry, no backoff, no pagination.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};

use crate::session::SessionStore;
use crate::{tlog_debug, tlog_trace, tlog_warn, Error, Result};

use super::types::{
    flatten_auth_error, AuthResponse, LoginPayload, RegisterPayload, Task, TaskMove, TaskPayload,
    User,
};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST /auth/login/ — the trailing slash matters to the backend.
    /// On success the access token is stored before returning.
    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse> {
        tlog_debug!("ApiClient::login username={}", payload.username);
        self.authenticate(self.url("auth/login/"), payload).await
    }

    /// POST /auth/register — same response shape as login.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse> {
        tlog_debug!("ApiClient::register username={}", payload.username);
        self.authenticate(self.url("auth/register"), payload).await
    }

    async fn authenticate<P: serde::Serialize>(
        &self,
        url: String,
        payload: &P,
    ) -> Result<AuthResponse> {
        let resp = self.http.post(&url).json(payload).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let message = flatten_auth_error(&body);
            tlog_warn!("Auth request rejected ({}): {}", status, message);
            return Err(Error::Auth(message));
        }
        let auth: AuthResponse = resp.json().await?;
        self.session.set_token(&auth.access)?;
        Ok(auth)
    }

    /// GET /auth/users — the assignee picklist.
    pub async fn users(&self) -> Result<Vec<User>> {
        let resp = self.send_authorized(self.http.get(self.url("auth/users"))).await?;
        Ok(resp.json().await?)
    }

    /// GET /task — the full task list, replacing the in-memory copy.
    pub async fn tasks(&self) -> Result<Vec<Task>> {
        let resp = self.send_authorized(self.http.get(self.url("task"))).await?;
        let tasks: Vec<Task> = resp.json().await?;
        tlog_trace!("GET /task -> {} tasks", tasks.len());
        Ok(tasks)
    }

    /// POST /task — the server assigns the ordering value.
    pub async fn create_task(&self, payload: &TaskPayload) -> Result<Task> {
        tlog_debug!("ApiClient::create_task title={:?}", payload.title);
        let resp = self
            .send_authorized(self.http.post(self.url("task")).json(payload))
            .await?;
        Ok(resp.json().await?)
    }

    /// PUT /task/{id} — full update from the edit form.
    pub async fn update_task(&self, id: i64, payload: &TaskPayload) -> Result<Task> {
        tlog_debug!("ApiClient::update_task id={}", id);
        let resp = self
            .send_authorized(self.http.put(self.url(&format!("task/{}", id))).json(payload))
            .await?;
        Ok(resp.json().await?)
    }

    /// PATCH /task/{id} — a board move: status and ordering only.
    pub async fn move_task(&self, id: i64, body: TaskMove) -> Result<Task> {
        tlog_debug!(
            "ApiClient::move_task id={} status={:?} ordering={}",
            id,
            body.status,
            body.ordering
        );
        let resp = self
            .send_authorized(self.http.patch(self.url(&format!("task/{}", id))).json(&body))
            .await?;
        Ok(resp.json().await?)
    }

    /// Attach the bearer token, send, and map the response status.
    /// A 401 clears the session so every consumer observes the flag flip.
    async fn send_authorized(&self, req: RequestBuilder) -> Result<Response> {
        let req = match self.session.token() {
            Some(token) => req.header("Authorization", format!("Bearer {}", token)),
            None => req,
        };
        let resp = req.send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            tlog_warn!("401 from backend, clearing session");
            self.session.clear();
            return Err(Error::Unauthorized);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                format!("request failed with status {}", status)
            } else {
                // Bodies can be HTML error pages; keep notifications short.
                body.trim().chars().take(120).collect()
            };
            return Err(Error::Api { status, message });
        }
        Ok(resp)
    }
}
