//! Request Executor
//!
//! Single choke point for authenticated resource calls. Every call yields exactly
//! one [`RequestOutcome`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{LucidError, LucidResult};
use crate::flows::AuthorizationFlow;
use crate::token::ClientSession;

/// Reason attached to every 401 response, whatever the body says.
pub const AUTH_FAILURE_REASON: &str =
    "An admin on the Lucid account may have revoked access for this OAuth2 client.";

/// Header carrying the requested API version.
pub const API_VERSION_HEADER: &str = "Lucid-Api-Version";

/// One resource call.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Query parameters appended to `url`.
    pub query: Vec<(String, String)>,
    /// JSON body, sent for POST and PUT only.
    pub body: Option<Value>,
    /// Overrides the configured API version.
    pub api_version: Option<String>,
    /// Upper bound on token acquisition plus the HTTP exchange.
    pub deadline: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
            api_version: None,
            deadline: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Build from a method name. Anything but GET, POST, PUT or DELETE is `InvalidArgument`.
    pub fn parse(method: &str, url: impl Into<String>) -> LucidResult<Self> {
        Ok(Self::new(method.parse()?, url))
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let name = name.into();
        self.query.retain(|(k, _)| *k != name);
        self.query.push((name, value.to_string()));
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Same call against a self-contained next-page URL.
    pub(crate) fn follow(&self, url: String) -> Self {
        Self {
            url,
            query: Vec::new(),
            ..self.clone()
        }
    }

    fn full_url(&self) -> LucidResult<String> {
        if self.query.is_empty() {
            return Ok(self.url.clone());
        }
        let mut url = url::Url::parse(&self.url)
            .map_err(|e| LucidError::invalid_argument(format!("Invalid URL {}: {}", self.url, e)))?;
        url.query_pairs_mut().extend_pairs(self.query.iter());
        Ok(url.into())
    }
}

/// Successful response with its parsed body.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Response headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// Parsed JSON, or the raw text wrapped in `Value::String` when the body is not JSON.
    pub body: Value,
}

impl ApiResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Deserialize the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> LucidResult<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| LucidError::parse(format!("Failed to deserialize response: {}", e)))
    }
}

/// Classified result of one resource call.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestOutcome {
    Success(ApiResponse),
    /// 2xx with an empty body.
    EmptyBody,
    /// HTTP 401.
    AuthFailure { reason: String },
    /// Any other non-2xx status.
    ApiFailure { status: u16, body: String },
}

impl RequestOutcome {
    /// Classify a raw transport response.
    pub fn classify(response: HttpResponse) -> Self {
        if response.is_success() {
            if response.body.trim().is_empty() {
                return Self::EmptyBody;
            }
            let body = serde_json::from_str(&response.body)
                .unwrap_or_else(|_| Value::String(response.body.clone()));
            return Self::Success(ApiResponse {
                status: response.status,
                headers: response.headers,
                body,
            });
        }

        if response.status == 401 {
            return Self::AuthFailure {
                reason: AUTH_FAILURE_REASON.to_string(),
            };
        }

        Self::ApiFailure {
            status: response.status,
            body: response.body,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Turn failures into errors. `EmptyBody` becomes `Ok(None)`.
    pub fn into_result(self) -> LucidResult<Option<ApiResponse>> {
        match self {
            Self::Success(response) => Ok(Some(response)),
            Self::EmptyBody => Ok(None),
            Self::AuthFailure { reason } => Err(LucidError::Unauthorized { reason }),
            Self::ApiFailure { status, body } => Err(LucidError::Api { status, body }),
        }
    }

    /// Deserialize a successful body; an empty body is a parse error.
    pub fn into_json<T: DeserializeOwned>(self) -> LucidResult<T> {
        match self.into_result()? {
            Some(response) => response.json(),
            None => Err(LucidError::parse("Response body was empty")),
        }
    }
}

/// Issues authenticated requests for one session.
#[derive(Clone)]
pub struct RequestExecutor {
    session: Arc<ClientSession>,
    transport: Arc<dyn HttpTransport>,
    flow: Arc<dyn AuthorizationFlow>,
}

impl RequestExecutor {
    pub fn new(
        session: Arc<ClientSession>,
        transport: Arc<dyn HttpTransport>,
        flow: Arc<dyn AuthorizationFlow>,
    ) -> Self {
        Self {
            session,
            transport,
            flow,
        }
    }

    pub fn session(&self) -> &Arc<ClientSession> {
        &self.session
    }

    /// Execute a request and classify the response.
    ///
    /// Token and transport failures are errors; HTTP failures are outcome variants.
    pub async fn execute(&self, request: &ApiRequest) -> LucidResult<RequestOutcome> {
        match request.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.dispatch(request))
                .await
                .map_err(|_| LucidError::DeadlineExceeded { deadline })?,
            None => self.dispatch(request).await,
        }
    }

    /// Like [`execute`](Self::execute), but anything other than `Success` becomes `None`.
    pub async fn execute_tolerant(&self, request: &ApiRequest) -> Option<ApiResponse> {
        match self.execute(request).await {
            Ok(RequestOutcome::Success(response)) => Some(response),
            Ok(outcome) => {
                warn!(
                    method = %request.method,
                    url = %request.url,
                    outcome = ?outcome,
                    "Request did not succeed; returning no result"
                );
                None
            }
            Err(e) => {
                warn!(
                    method = %request.method,
                    url = %request.url,
                    error = %e,
                    "Request failed; returning no result"
                );
                None
            }
        }
    }

    async fn dispatch(&self, request: &ApiRequest) -> LucidResult<RequestOutcome> {
        let token = self.flow.access_token(&self.session).await?;
        let config = self.session.config();
        let url = request.full_url()?;

        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        headers.insert(
            API_VERSION_HEADER.to_string(),
            request
                .api_version
                .clone()
                .unwrap_or_else(|| config.api_version.clone()),
        );
        headers.insert("Accept".to_string(), "application/json".to_string());

        let body = if request.method.has_body() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
            let body = request.body.as_ref().unwrap_or(&Value::Null);
            Some(
                serde_json::to_string(body)
                    .map_err(|e| LucidError::parse(format!("Failed to serialize body: {}", e)))?,
            )
        } else {
            None
        };

        debug!(
            method = %request.method,
            url = %url,
            headers = ?redacted(&headers),
            body = body.as_deref().unwrap_or(""),
            "Sending request"
        );

        let response = self
            .transport
            .send(HttpRequest {
                method: request.method,
                url,
                headers,
                body,
                timeout: Some(config.timeout),
            })
            .await?;

        debug!(
            status = response.status,
            headers = ?response.headers,
            body = %response.body,
            "Received response"
        );

        Ok(RequestOutcome::classify(response))
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn redacted(headers: &HashMap<String, String>) -> HashMap<&str, &str> {
    headers
        .iter()
        .map(|(k, v)| {
            if k.eq_ignore_ascii_case("authorization") {
                (k.as_str(), "Bearer [REDACTED]")
            } else {
                (k.as_str(), v.as_str())
            }
        })
        .collect()
}
