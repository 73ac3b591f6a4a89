//! User management.

use serde_json::Value;
use std::str::FromStr;

use crate::client::{ApiRequest, RequestExecutor, RequestOutcome};
use crate::core::{encode_component, HttpMethod};
use crate::error::{LucidError, LucidResult};
use crate::pagination::{extract_items, Extractor, PageStream, Paginator};
use crate::scope::ScopeGuard;
use crate::types::Scope;

const USER_SCOPES: &[Scope] = &[Scope::AccountUser, Scope::AccountUserReadonly];

/// Action accepted by [`UsersService::manage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserAction {
    View,
    Create,
    Update,
    Delete,
}

impl UserAction {
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::View)
    }

    fn method(&self) -> HttpMethod {
        match self {
            Self::View => HttpMethod::Get,
            Self::Create => HttpMethod::Post,
            Self::Update => HttpMethod::Put,
            Self::Delete => HttpMethod::Delete,
        }
    }
}

impl FromStr for UserAction {
    type Err = LucidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(LucidError::invalid_argument(
                "Invalid action. Must be 'create', 'update', 'delete', or 'view'",
            )),
        }
    }
}

/// Result of [`UsersService::manage`].
#[derive(Debug)]
pub enum UserActionOutcome {
    /// `View`: the user listing, page by page.
    Pages(PageStream),
    /// Write actions: the single call's outcome.
    Response(RequestOutcome),
}

/// `/users` resource.
#[derive(Clone, Debug)]
pub struct UsersService {
    executor: RequestExecutor,
}

impl UsersService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    fn users_url(&self) -> String {
        self.executor.session().config().resource_url("users")
    }

    /// View, create, update or delete users.
    ///
    /// Any user scope allows `View`. Write actions need `account.user`.
    pub async fn manage(
        &self,
        action: UserAction,
        user_data: Option<Value>,
        page_size: u32,
    ) -> LucidResult<UserActionOutcome> {
        let granted = self.executor.session().granted_scopes();
        ScopeGuard::require(granted, USER_SCOPES)?;
        if action.is_write() {
            ScopeGuard::require(granted, &[Scope::AccountUser])?;
        }

        let mut request = ApiRequest::new(action.method(), self.users_url());
        if let Some(data) = user_data {
            request = request.with_body(data);
        }

        match action {
            UserAction::View => Ok(UserActionOutcome::Pages(
                Paginator::new(self.executor.clone(), request)
                    .with_page_size(page_size)
                    .pages(),
            )),
            _ => Ok(UserActionOutcome::Response(
                self.executor.execute(&request).await?,
            )),
        }
    }

    /// `GET /users/{id}`.
    pub async fn get(&self, user_id: &str) -> LucidResult<Value> {
        ScopeGuard::require(self.executor.session().granted_scopes(), USER_SCOPES)?;

        let url = format!("{}/{}", self.users_url(), encode_component(user_id));
        self.executor
            .execute(&ApiRequest::get(url))
            .await?
            .into_json()
    }

    /// `GET /users`, single request, items from `users`.
    pub async fn list(&self) -> LucidResult<Vec<Value>> {
        ScopeGuard::require(self.executor.session().granted_scopes(), USER_SCOPES)?;

        let body: Value = self
            .executor
            .execute(&ApiRequest::get(self.users_url()))
            .await?
            .into_json()?;
        let users: Extractor = std::sync::Arc::new(|body: &Value| body.get("users").cloned());
        extract_items(&users, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::executor;
    use serde_json::json;

    #[test]
    fn test_action_parsing() {
        assert_eq!("View".parse::<UserAction>().unwrap(), UserAction::View);
        assert!(matches!(
            "archive".parse::<UserAction>(),
            Err(LucidError::InvalidArgument { .. })
        ));
    }

    #[tokio::test]
    async fn test_view_with_read_only_scope_pages() {
        let (transport, executor) = executor("account.user:readonly");
        transport
            .queue_json_page(
                &json!([{"id": 1}]),
                Some("<https://api.lucid.co/users?cursor=2>; rel=\"next\""),
            )
            .queue_json_page(&json!([{"id": 2}]), None);

        let outcome = UsersService::new(executor)
            .manage(UserAction::View, None, 50)
            .await
            .unwrap();
        let UserActionOutcome::Pages(mut pages) = outcome else {
            panic!("expected pages");
        };

        let mut bodies = Vec::new();
        while let Some(page) = pages.next_page().await {
            bodies.push(page.body);
        }
        assert_eq!(bodies, vec![json!([{"id": 1}]), json!([{"id": 2}])]);
        assert_eq!(
            transport.get_requests()[0].url,
            "https://api.lucid.co/users?pageSize=50"
        );
    }

    #[tokio::test]
    async fn test_write_with_read_only_scope_is_rejected() {
        let (transport, executor) = executor("account.user:readonly");
        let error = UsersService::new(executor)
            .manage(UserAction::Create, Some(json!({"email": "a@b.c"})), 200)
            .await
            .unwrap_err();

        assert_eq!(error.error_code(), "invalid_scopes");
        assert!(transport.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_sends_body() {
        let (transport, executor) = executor("account.user");
        transport.queue_json_response(201, &json!({"id": 7}));

        let outcome = UsersService::new(executor)
            .manage(UserAction::Create, Some(json!({"email": "a@b.c"})), 200)
            .await
            .unwrap();
        assert!(matches!(outcome, UserActionOutcome::Response(RequestOutcome::Success(_))));

        let sent = transport.get_last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url, "https://api.lucid.co/users");
        assert_eq!(sent.body.as_deref(), Some(r#"{"email":"a@b.c"}"#));
    }

    #[tokio::test]
    async fn test_no_user_scope() {
        let (_, executor) = executor("account.info");
        let result = UsersService::new(executor)
            .manage(UserAction::View, None, 200)
            .await;
        assert!(matches!(result, Err(LucidError::InsufficientScope { .. })));
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let (transport, executor) = executor("account.user:readonly");
        transport
            .queue_json_response(200, &json!({"userId": 5}))
            .queue_json_response(200, &json!({"users": [{"userId": 5}, {"userId": 6}]}));
        let users = UsersService::new(executor);

        assert_eq!(users.get("5").await.unwrap(), json!({"userId": 5}));
        assert_eq!(
            transport.get_last_request().unwrap().url,
            "https://api.lucid.co/users/5"
        );
        assert_eq!(users.list().await.unwrap().len(), 2);
    }
}
