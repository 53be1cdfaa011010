use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ApiRequest;
use crate::error::ClientError;

/// Transforms every outgoing request, in registration order.
pub trait RequestMiddleware: Send + Sync {
    /// Middleware name for logging and debugging
    fn name(&self) -> &'static str;

    /// Must be pure: same request in, same request out.
    fn on_request(&self, request: ApiRequest) -> ApiRequest;
}

/// What a response middleware did with a failure.
#[derive(Debug)]
pub enum ResponseOutcome {
    /// Pass the failure (possibly replaced) to the next middleware and then the caller.
    Propagate(ClientError),
    /// Failure fully handled; the caller sees `ClientError::SessionExpired`.
    Handled,
}

/// Sees every failed response, in registration order.
#[async_trait]
pub trait ResponseMiddleware: Send + Sync {
    fn name(&self) -> &'static str;

    async fn on_error(&self, request: &ApiRequest, error: ClientError) -> ResponseOutcome;
}

/// Ordered middleware chain owned by the API client.
#[derive(Default, Clone)]
pub struct Pipeline {
    request: Vec<Arc<dyn RequestMiddleware>>,
    response: Vec<Arc<dyn ResponseMiddleware>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request(mut self, middleware: Arc<dyn RequestMiddleware>) -> Self {
        self.request.push(middleware);
        self
    }

    pub fn with_response(mut self, middleware: Arc<dyn ResponseMiddleware>) -> Self {
        self.response.push(middleware);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.request
            .iter()
            .map(|m| m.name())
            .chain(self.response.iter().map(|m| m.name()))
            .collect()
    }

    pub fn apply_request(&self, request: ApiRequest) -> ApiRequest {
        self.request.iter().fold(request, |req, m| m.on_request(req))
    }

    /// Run the failure through the response chain; the first `Handled` stops it.
    pub async fn handle_error(&self, request: &ApiRequest, error: ClientError) -> ClientError {
        let mut error = error;
        for middleware in &self.response {
            match middleware.on_error(request, error).await {
                ResponseOutcome::Propagate(next) => error = next,
                ResponseOutcome::Handled => {
                    debug!("Failure on {} handled by {}", request.url, middleware.name());
                    return ClientError::SessionExpired;
                }
            }
        }
        error
    }
}
