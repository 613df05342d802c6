//! HTTP implementation of the session service port.
//!
//! Thin JSON-over-HTTP client for the platform's session endpoints. Each
//! trait operation maps to a single `POST`; payload field names follow the
//! platform's camel-case wire convention.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ServiceFuture, SessionService, StopReceipt};
use crate::{AppError, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartRequest<'a> {
    subject_id: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartResponse {
    session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRef<'a> {
    session_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StopRequest<'a> {
    session_id: &'a str,
    elapsed_seconds: u64,
}

/// [`SessionService`] backed by the platform's REST API.
#[derive(Debug, Clone)]
pub struct HttpSessionService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionService {
    /// Build a client for the given base URL (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/sessions/{path}", self.base_url)
    }

    /// POST a JSON body and fail on non-2xx responses.
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        debug!(%url, "posting to session service");
        let response = self.client.post(&url).json(body).send().await?;
        let response = response.error_for_status()?;
        Ok(response)
    }
}

impl SessionService for HttpSessionService {
    fn start(&self, subject_id: &str, user_id: &str) -> ServiceFuture<'_, String> {
        let subject_id = subject_id.to_owned();
        let user_id = user_id.to_owned();
        Box::pin(async move {
            let body = StartRequest {
                subject_id: &subject_id,
                user_id: &user_id,
            };
            let response = self
                .post("start", &body)
                .await
                .map_err(|err| AppError::Start(err.to_string()))?;
            let parsed: StartResponse = response
                .json()
                .await
                .map_err(|err| AppError::Start(format!("invalid start response: {err}")))?;
            Ok(parsed.session_id)
        })
    }

    fn pause(&self, session_id: &str) -> ServiceFuture<'_, ()> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            self.post(
                "pause",
                &SessionRef {
                    session_id: &session_id,
                },
            )
            .await
            .map_err(|err| AppError::Transition(err.to_string()))?;
            Ok(())
        })
    }

    fn auto_pause(&self, session_id: &str) -> ServiceFuture<'_, ()> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            self.post(
                "auto-pause",
                &SessionRef {
                    session_id: &session_id,
                },
            )
            .await
            .map_err(|err| AppError::Transition(err.to_string()))?;
            Ok(())
        })
    }

    fn resume(&self, session_id: &str) -> ServiceFuture<'_, ()> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            self.post(
                "resume",
                &SessionRef {
                    session_id: &session_id,
                },
            )
            .await
            .map_err(|err| AppError::Transition(err.to_string()))?;
            Ok(())
        })
    }

    fn heartbeat(&self, session_id: &str) -> ServiceFuture<'_, ()> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            self.post(
                "heartbeat",
                &SessionRef {
                    session_id: &session_id,
                },
            )
            .await
            .map_err(|err| AppError::Heartbeat(err.to_string()))?;
            Ok(())
        })
    }

    fn stop(&self, session_id: &str, elapsed_seconds: u64) -> ServiceFuture<'_, StopReceipt> {
        let session_id = session_id.to_owned();
        Box::pin(async move {
            let response = self
                .post(
                    "stop",
                    &StopRequest {
                        session_id: &session_id,
                        elapsed_seconds,
                    },
                )
                .await
                .map_err(|err| AppError::Stop(err.to_string()))?;
            let receipt: StopReceipt = response
                .json()
                .await
                .map_err(|err| AppError::Stop(format!("invalid stop response: {err}")))?;
            Ok(receipt)
        })
    }
}
