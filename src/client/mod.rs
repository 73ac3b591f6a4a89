//! Lucid Client
//!
//! High-level client combining the authorization flow, the request executor and
//! the resource services for one session.

pub mod executor;

pub use executor::{
    ApiRequest, ApiResponse, RequestExecutor, RequestOutcome, API_VERSION_HEADER,
    AUTH_FAILURE_REASON,
};

use std::sync::Arc;

use crate::core::{HttpTransport, ReqwestHttpTransport};
use crate::error::LucidResult;
use crate::flows::{AuthorizationFlow, LucidAuthorizationFlow};
use crate::pagination::Paginator;
use crate::services::{AccountService, DocumentsService, UsersService};
use crate::token::ClientSession;
use crate::types::{IntrospectionResult, LucidConfig, TokenMaterial};

/// Lucid API client.
pub struct LucidClient<T: HttpTransport + 'static = ReqwestHttpTransport> {
    session: Arc<ClientSession>,
    flow: Arc<LucidAuthorizationFlow<T>>,
    executor: RequestExecutor,
}

impl LucidClient<ReqwestHttpTransport> {
    /// Create a client over the default reqwest transport.
    pub fn new(config: LucidConfig) -> LucidResult<Self> {
        let transport = ReqwestHttpTransport::with_timeout(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport + 'static> LucidClient<T> {
    /// Create a client with a custom transport.
    pub fn with_transport(config: LucidConfig, transport: T) -> Self {
        Self::with_session(Arc::new(ClientSession::new(config)), Arc::new(transport))
    }

    /// Create a client around an existing session, e.g. one restored with tokens.
    pub fn with_session(session: Arc<ClientSession>, transport: Arc<T>) -> Self {
        let flow = Arc::new(LucidAuthorizationFlow::new(transport.clone()));
        let executor = RequestExecutor::new(session.clone(), transport, flow.clone());
        Self {
            session,
            flow,
            executor,
        }
    }

    pub fn config(&self) -> &LucidConfig {
        self.session.config()
    }

    pub fn session(&self) -> &Arc<ClientSession> {
        &self.session
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// URL to send the user to for consent.
    pub fn authorization_url(&self) -> String {
        self.flow.build_authorization_url(&self.session)
    }

    /// Exchange the code from the redirect for tokens.
    pub async fn exchange_code(&self, code: &str) -> LucidResult<TokenMaterial> {
        self.flow.exchange_code(&self.session, code).await
    }

    pub async fn refresh(&self) -> LucidResult<TokenMaterial> {
        self.flow.refresh(&self.session).await
    }

    pub async fn introspect(&self, token: &str) -> LucidResult<IntrospectionResult> {
        self.flow.introspect(&self.session, token).await
    }

    /// Whether the provider reports the current access token as active.
    pub async fn is_token_valid(&self) -> bool {
        self.flow.is_valid(&self.session).await
    }

    /// Current access token, refreshed first if it is about to expire.
    pub async fn access_token(&self) -> LucidResult<String> {
        self.flow.access_token(&self.session).await
    }

    /// Execute an arbitrary request.
    pub async fn execute(&self, request: &ApiRequest) -> LucidResult<RequestOutcome> {
        self.executor.execute(request).await
    }

    /// Paginate an arbitrary collection request.
    pub fn paginate(&self, request: ApiRequest) -> Paginator {
        Paginator::new(self.executor.clone(), request)
    }

    pub fn account(&self) -> AccountService {
        AccountService::new(self.executor.clone())
    }

    pub fn users(&self) -> UsersService {
        UsersService::new(self.executor.clone())
    }

    pub fn documents(&self) -> DocumentsService {
        DocumentsService::new(self.executor.clone())
    }
}

impl<T: HttpTransport + 'static> std::fmt::Debug for LucidClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LucidClient")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Create a client over the default transport.
pub fn lucid_client(config: LucidConfig) -> LucidResult<LucidClient> {
    LucidClient::new(config)
}
