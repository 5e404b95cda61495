//! Pollution API HTTP client
//!
//! Handles login, token refresh and the authenticated data request.
//!
//! ## Auth Protocol
//!
//! The upstream issues a short-lived access token via `POST /auth/login`
//! and, on most deployments, a refresh token alongside it. Data requests
//! carry `Authorization: Bearer <token>`. When a data request comes back
//! 401, the client walks a bounded recovery ladder:
//!
//! 1. Refresh the access token if a refresh token is held.
//! 2. If the refresh fails (or no refresh token exists), log in again.
//! 3. Retry the original request exactly once with the new token.
//!
//! A 401 on the retry is a hard `AuthError`. There are no retry loops.
//!
//! Concurrent callers serialize on the session lock, so a burst of
//! requests hitting an expired token performs one recovery, not many
//! duplicate logins.

use super::dto;
use super::token::Session;
use crate::config::PollutionApiConfig;
use crate::error::{Error, Result};
use crate::model::RawRecord;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::sync::Mutex;

/// Upper bound on any single upstream request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Pollution API client
pub struct PollutionClient {
    http_client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    session: Mutex<Session>,
}

impl PollutionClient {
    /// Create a new client from config.
    ///
    /// Fails if the base URL or credentials are missing; this is where
    /// the env surface is actually validated.
    pub fn new(config: &PollutionApiConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::config("POLLUTION_API_BASE_URL is not set"));
        }
        if config.username.is_empty() || config.password.is_empty() {
            return Err(Error::config(
                "POLLUTION_API_USERNAME / POLLUTION_API_PASSWORD are not set",
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            session: Mutex::new(Session::default()),
        })
    }

    /// Create a client for testing with a custom base URL
    #[cfg(test)]
    pub fn with_base_url(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            session: Mutex::new(Session::default()),
        }
    }

    /// Fetch one page of raw pollution records for a country.
    pub async fn fetch_pollution(
        &self,
        country: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<RawRecord>> {
        tracing::debug!(country, page, limit, "fetching pollution page");
        let mut session = self.session.lock().await;

        let token = match session.access_token() {
            Some(token) => token.to_string(),
            None => self.login(&mut session).await?,
        };

        let response = self.send_records_request(&token, country, page, limit).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::handle_records_response(response).await;
        }

        // Token rejected: recover once, then retry exactly once.
        tracing::debug!(country, "access token rejected, recovering");
        session.expire();

        let token = match session.refresh_token().map(str::to_string) {
            Some(refresh) => match self.refresh(&refresh).await {
                Ok(access) => {
                    session.refresh_succeeded(access.clone());
                    access
                }
                Err(err) => {
                    tracing::warn!(error = %err, "refresh failed, falling back to login");
                    session.drop_refresh();
                    self.login(&mut session).await?
                }
            },
            None => self.login(&mut session).await?,
        };

        let retry = self.send_records_request(&token, country, page, limit).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            session.log_out();
            return Err(Error::auth("pollution API rejected a freshly issued token"));
        }
        Self::handle_records_response(retry).await
    }

    /// Log in with the stored credentials and install the returned tokens.
    ///
    /// A rejected login is fatal for the call; it is never retried.
    async fn login(&self, session: &mut Session) -> Result<String> {
        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&dto::LoginRequest {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|e| Error::upstream_unavailable(format!("login request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            session.log_out();
            let message = Self::error_message(response).await;
            return Err(Error::auth(format!(
                "login rejected (HTTP {}): {}",
                status.as_u16(),
                message
            )));
        }

        let body: dto::LoginResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream(status.as_u16(), format!("unparseable login response: {e}")))?;

        tracing::debug!(
            has_refresh_token = body.refresh_token.is_some(),
            "logged in to pollution API"
        );
        session.log_in(body.token.clone(), body.refresh_token);
        Ok(body.token)
    }

    /// Exchange the refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let url = format!("{}/auth/refresh", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&dto::RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| Error::upstream_unavailable(format!("refresh request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(Error::auth(format!(
                "refresh rejected (HTTP {}): {}",
                status.as_u16(),
                message
            )));
        }

        let body: dto::RefreshResponse = response
            .json()
            .await
            .map_err(|e| Error::upstream(status.as_u16(), format!("unparseable refresh response: {e}")))?;
        Ok(body.token)
    }

    /// Issue the authenticated data request. Only transport failures are
    /// mapped here; status handling happens in the caller so the 401 path
    /// can drive recovery.
    async fn send_records_request(
        &self,
        token: &str,
        country: &str,
        page: u32,
        limit: u32,
    ) -> Result<reqwest::Response> {
        let url = format!(
            "{}/pollution?country={}&page={}&limit={}",
            self.base_url,
            urlencoding::encode(country),
            page,
            limit
        );

        self.http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::upstream_unavailable(format!("pollution request failed: {e}")))
    }

    /// Map a non-401 data response to records or a taxonomy error.
    async fn handle_records_response(response: reqwest::Response) -> Result<Vec<RawRecord>> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::rate_limited("pollution API throttled the request"));
        }
        if status == StatusCode::BAD_REQUEST {
            let message = Self::error_message(response).await;
            return Err(Error::validation(message));
        }
        if !status.is_success() {
            let message = Self::error_message(response).await;
            return Err(Error::upstream(status.as_u16(), message));
        }

        let envelope: dto::RecordsEnvelope = response
            .json()
            .await
            .map_err(|e| Error::upstream(status.as_u16(), format!("unparseable pollution response: {e}")))?;
        Ok(envelope.into_records())
    }

    /// Best-effort extraction of an upstream error message.
    async fn error_message(response: reqwest::Response) -> String {
        let fallback = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();
        match response.json::<dto::ApiErrorBody>().await {
            Ok(body) => body.message().map(str::to_string).unwrap_or(fallback),
            Err(_) => fallback,
        }
    }
}
