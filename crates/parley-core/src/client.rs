//! HTTP client for the four chat endpoints.
//!
//! Send, history, reset and feedback all share the same contract: a JSON
//! body with a `success` flag. A call only counts as successful when both
//! the transport succeeded and the flag is true; everything else maps onto
//! the [`ApiError`] taxonomy. How each failure is surfaced (notice, inline
//! annotation, log-only) is the caller's concern.

use serde::de::DeserializeOwned;
use tracing::debug;

use parley_types::{
    FeedbackRequest, FeedbackResponse, HistoryMessage, HistoryResponse, ResetRequest,
    ResetResponse, SendRequest, SendResponse,
};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};

/// A successful chat reply.
///
/// `message_id` is absent when the server did not persist the message;
/// such replies render normally but cannot collect feedback.
#[derive(Debug, Clone)]
pub struct SendReply {
    pub text: String,
    pub message_id: Option<String>,
}

/// Client for one chat session against one server.
#[derive(Debug, Clone)]
pub struct ChatApi {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl ChatApi {
    /// Creates a client for the given session.
    ///
    /// The session id is an opaque caller-supplied token; this crate never
    /// inspects or generates it.
    pub fn new(config: &Config, session_id: impl Into<String>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_id: session_id.into(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// `POST /api/chat`: sends one user message, returns the reply.
    pub async fn send_message(&self, message: &str) -> ApiResult<SendReply> {
        let request = SendRequest {
            message: message.to_string(),
            session_id: self.session_id.clone(),
        };
        let url = format!("{}/api/chat", self.base_url);
        debug!(url, "sending chat message");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;
        let body: SendResponse = decode(response).await?;

        if !body.success {
            return Err(ApiError::api(body.error));
        }
        let Some(text) = body.response else {
            return Err(ApiError::api(Some(
                "Response was missing the reply text.".to_string(),
            )));
        };
        Ok(SendReply {
            text,
            message_id: body.message_id,
        })
    }

    /// `GET /api/history`: fetches the session's persisted messages.
    pub async fn fetch_history(&self) -> ApiResult<Vec<HistoryMessage>> {
        let url = format!("{}/api/history", self.base_url);
        debug!(url, "loading history");

        let response = self
            .http
            .get(&url)
            .query(&[("session_id", self.session_id.as_str())])
            .send()
            .await
            .map_err(classify_reqwest_error)?;
        let body: HistoryResponse = decode(response).await?;

        if !body.success {
            return Err(ApiError::api(body.error));
        }
        Ok(body.messages)
    }

    /// `POST /api/reset`: clears the session's server-side history.
    pub async fn reset_session(&self) -> ApiResult<()> {
        let request = ResetRequest {
            session_id: self.session_id.clone(),
        };
        let url = format!("{}/api/reset", self.base_url);
        debug!(url, "resetting session");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;
        let body: ResetResponse = decode(response).await?;

        if !body.success {
            return Err(ApiError::api(body.error));
        }
        Ok(())
    }

    /// `POST /api/feedback`: submits a rating and optional comment for
    /// one persisted assistant message.
    pub async fn submit_feedback(
        &self,
        message_id: &str,
        rating: u8,
        comment: &str,
    ) -> ApiResult<()> {
        let request = FeedbackRequest {
            message_id: message_id.to_string(),
            rating,
            comment: comment.to_string(),
        };
        let url = format!("{}/api/feedback", self.base_url);
        debug!(url, message_id, rating, "submitting feedback");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;
        let body: FeedbackResponse = decode(response).await?;

        if !body.success {
            return Err(ApiError::api(body.error));
        }
        Ok(())
    }
}

/// Decodes a response body, keeping the error-status context when the
/// body was not the expected shape.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    match response.json::<T>().await {
        Ok(body) => Ok(body),
        Err(_) if !status.is_success() => Err(ApiError::api(Some(format!("HTTP {status}")))),
        Err(e) => Err(ApiError::api(Some(format!("Malformed response: {e}")))),
    }
}

fn classify_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::transport(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ApiError::transport(format!("Connection failed: {e}"))
    } else {
        ApiError::transport(format!("Network error: {e}"))
    }
}
