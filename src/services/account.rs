//! Account information.

use crate::client::{ApiRequest, RequestExecutor};
use crate::error::LucidResult;
use crate::scope::ScopeGuard;
use crate::types::{AccountInfo, Scope};

/// `/accounts` resource.
#[derive(Clone, Debug)]
pub struct AccountService {
    executor: RequestExecutor,
}

impl AccountService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// `GET /accounts/me`.
    pub async fn info(&self) -> LucidResult<AccountInfo> {
        let session = self.executor.session();
        ScopeGuard::require(session.granted_scopes(), &[Scope::AccountInfo])?;

        let request = ApiRequest::get(session.config().resource_url("accounts/me"));
        self.executor.execute(&request).await?.into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LucidError;
    use crate::services::test_support::executor;
    use serde_json::json;

    #[tokio::test]
    async fn test_info() {
        let (transport, executor) = executor("account.info");
        transport.queue_json_response(200, &json!({"id": 42, "name": "Acme"}));

        let info = AccountService::new(executor).info().await.unwrap();
        assert_eq!(
            info,
            AccountInfo {
                id: 42,
                name: "Acme".to_string()
            }
        );
        assert_eq!(
            transport.get_last_request().unwrap().url,
            "https://api.lucid.co/accounts/me"
        );
    }

    #[tokio::test]
    async fn test_info_requires_scope() {
        let (transport, executor) = executor("user.profile");
        let error = AccountService::new(executor).info().await.unwrap_err();
        assert!(matches!(error, LucidError::InsufficientScope { .. }));
        assert!(transport.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_info_unauthorized() {
        let (transport, executor) = executor("account.info");
        transport.queue_raw_response(401, &[], "{}");
        let error = AccountService::new(executor).info().await.unwrap_err();
        assert!(matches!(error, LucidError::Unauthorized { .. }));
    }
}
