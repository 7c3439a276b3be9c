//! Chat completions service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::auth::AuthProvider;
use crate::errors::{AdapterError, AdapterResult, ApiErrorResponse};
use crate::observability::{LogConfig, RequestTimer};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::types::completions::{CompletionRequest, CompletionResponse};

const COMPLETIONS_PATH: &str = "chat/completions";

/// Blocking chat completions service.
pub struct CompletionsService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    custom_headers: Vec<(String, String)>,
    log_config: LogConfig,
}

impl CompletionsService {
    /// Creates a new completions service.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        custom_headers: Vec<(String, String)>,
        log_config: LogConfig,
    ) -> Self {
        Self {
            transport,
            auth,
            custom_headers,
            log_config,
        }
    }

    /// Creates a chat completion. Blocks until the vendor answers.
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    pub fn create(&self, request: &CompletionRequest) -> AdapterResult<CompletionResponse> {
        let http_request = self.build_request(request)?;

        let timer = RequestTimer::start("chat.completions");
        let result = self
            .transport
            .send(http_request)
            .map_err(AdapterError::from)
            .and_then(|response| self.parse_response(response));
        timer.finish(result.is_ok());

        result
    }

    /// Builds an HTTP request from a completion request.
    fn build_request(&self, request: &CompletionRequest) -> AdapterResult<HttpRequest> {
        let body = serde_json::to_vec(request)?;

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());

        for (name, value) in &self.custom_headers {
            headers.insert(name.clone(), value.clone());
        }

        self.auth.apply_auth(&mut headers);

        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: COMPLETIONS_PATH.to_string(),
            headers,
            body: Some(body),
            timeout: None,
        })
    }

    /// Parses the HTTP response.
    fn parse_response(&self, response: HttpResponse) -> AdapterResult<CompletionResponse> {
        if !response.is_success() {
            return Err(self.parse_error_response(&response));
        }

        response.json().map_err(|e| AdapterError::Serialization {
            message: format!("Failed to parse completion response: {}", e),
        })
    }

    /// Parses an error response.
    fn parse_error_response(&self, response: &HttpResponse) -> AdapterError {
        let status = response.status;
        let request_id = response.header("x-request-id").map(str::to_string);
        let raw_body = self
            .log_config
            .loggable_body(&String::from_utf8_lossy(&response.body));

        let (message, error_type, param) =
            match serde_json::from_slice::<ApiErrorResponse>(&response.body) {
                Ok(body) => (body.error.message, body.error.error_type, body.error.param),
                Err(_) if raw_body.is_empty() => (format!("HTTP {}", status), None, None),
                Err(_) => (raw_body.clone(), None, None),
            };

        match (status, error_type.as_deref().unwrap_or("")) {
            (401, _) | (_, "invalid_api_key") => AdapterError::Authentication {
                message,
                api_key_hint: self.auth.hint(),
            },
            (403, _) => AdapterError::Authorization { message },
            (404, _) | (_, "model_not_found") => AdapterError::Model {
                message,
                model: param.unwrap_or_default(),
            },
            (400 | 422, _) => AdapterError::Validation { message, param },
            (429, _) => AdapterError::RateLimit {
                message,
                retry_after: response
                    .header("retry-after")
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .map(Duration::from_secs),
            },
            (500..=599, _) => AdapterError::Server {
                message,
                status_code: status,
                request_id,
            },
            _ => AdapterError::Api {
                status,
                message,
                body: Some(raw_body).filter(|b| !b.is_empty()),
            },
        }
    }
}

impl std::fmt::Debug for CompletionsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionsService")
            .field("scheme", &self.auth.scheme())
            .finish()
    }
}
