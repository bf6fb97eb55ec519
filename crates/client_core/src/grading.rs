use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{GradingReply, SubmissionResult, SubmitAnswerRequest};
use tracing::debug;
use url::Url;

use crate::error::GradingError;

/// Remote grading call. Implementations report an incorrect answer as a
/// graded result and reserve `Err` for calls that did not grade at all.
#[async_trait]
pub trait GradingClient: Send + Sync {
    async fn submit_answer(
        &self,
        request: &SubmitAnswerRequest,
    ) -> std::result::Result<SubmissionResult, GradingError>;
}

pub struct UnconfiguredGradingClient;

#[async_trait]
impl GradingClient for UnconfiguredGradingClient {
    async fn submit_answer(
        &self,
        _request: &SubmitAnswerRequest,
    ) -> std::result::Result<SubmissionResult, GradingError> {
        Err(GradingError::Transport(
            "no grading endpoint configured".to_string(),
        ))
    }
}

pub struct HttpGradingClient {
    http: Client,
    handler_url: Url,
}

impl HttpGradingClient {
    pub fn new(handler_url: Url) -> Self {
        Self {
            http: Client::new(),
            handler_url,
        }
    }

    pub fn from_handler_url(raw: &str) -> Result<Self> {
        let handler_url = Url::parse(raw.trim())
            .with_context(|| format!("invalid grading handler url '{raw}'"))?;
        Ok(Self::new(handler_url))
    }

    pub fn handler_url(&self) -> &Url {
        &self.handler_url
    }
}

#[async_trait]
impl GradingClient for HttpGradingClient {
    async fn submit_answer(
        &self,
        request: &SubmitAnswerRequest,
    ) -> std::result::Result<SubmissionResult, GradingError> {
        debug!(url = %self.handler_url, items = request.0.len(), "posting answer");
        let response = self
            .http
            .post(self.handler_url.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        match GradingReply::decode(status, &body)? {
            GradingReply::Graded(result) => Ok(result),
            GradingReply::Failed { status, body } => Err(GradingError::Server {
                status,
                message: body.error,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/grading_tests.rs"]
mod tests;
