//! Documents: listing, search and contents.

use crate::client::{ApiRequest, RequestExecutor};
use crate::core::{encode_component, HttpMethod};
use crate::error::{LucidError, LucidResult};
use crate::pagination::Paginator;
use crate::scope::ScopeGuard;
use crate::types::{Document, DocumentContent, DocumentSearchParameters, Scope};

const DOCUMENT_SCOPES: &[Scope] = &[Scope::DocumentContent, Scope::DocumentContentReadonly];

/// Fields requested by [`DocumentsService::list`].
pub const LIST_FIELDS: &str = "id,title,status,type,owner";

/// `/documents` resource.
#[derive(Clone, Debug)]
pub struct DocumentsService {
    executor: RequestExecutor,
}

impl DocumentsService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    fn guard(&self) -> LucidResult<()> {
        ScopeGuard::require(self.executor.session().granted_scopes(), DOCUMENT_SCOPES)
    }

    fn url(&self, path: &str) -> String {
        self.executor.session().config().resource_url(path)
    }

    /// Every document visible to the user, following pagination.
    pub async fn list(&self, page_size: u32) -> LucidResult<Vec<Document>> {
        self.guard()?;

        let request = ApiRequest::get(self.url("documents")).with_query("fields", LIST_FIELDS);
        Paginator::new(self.executor.clone(), request)
            .with_page_size(page_size)
            .with_field("documents")
            .collect()
            .await
    }

    /// `POST /documents/search`. A page may be an array of documents or a single one.
    pub async fn search(&self, parameters: DocumentSearchParameters) -> LucidResult<Vec<Document>> {
        self.guard()?;

        let body = serde_json::to_value(parameters.normalized())
            .map_err(|e| LucidError::parse(format!("Failed to serialize search: {}", e)))?;
        let request =
            ApiRequest::new(HttpMethod::Post, self.url("documents/search")).with_body(body);

        Paginator::new(self.executor.clone(), request).collect().await
    }

    /// `GET /documents/{id}/contents`.
    pub async fn contents(&self, document_id: &str) -> LucidResult<DocumentContent> {
        self.guard()?;

        let path = format!("documents/{}/contents", encode_component(document_id));
        self.executor
            .execute(&ApiRequest::get(self.url(&path)))
            .await?
            .into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::executor;
    use serde_json::json;

    const SCOPES: &str = "lucidchart.document.content:readonly";

    #[tokio::test]
    async fn test_list_follows_pages() {
        let (transport, executor) = executor(SCOPES);
        transport
            .queue_json_page(
                &json!({"documents": [{"documentId": "a"}]}),
                Some("<https://api.lucid.co/documents?pageToken=t2>; rel=\"next\""),
            )
            .queue_json_page(&json!({"documents": [{"documentId": "b"}]}), None);

        let documents = DocumentsService::new(executor).list(500).await.unwrap();
        let ids: Vec<_> = documents.iter().map(|d| d.document_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let first = &transport.get_requests()[0];
        assert_eq!(
            first.url,
            "https://api.lucid.co/documents?fields=id%2Ctitle%2Cstatus%2Ctype%2Cowner&pageSize=200"
        );
    }

    #[tokio::test]
    async fn test_search_accepts_single_object() {
        let (transport, executor) = executor(SCOPES);
        transport.queue_json_page(&json!({"documentId": "only"}), None);

        let params = DocumentSearchParameters::default().keywords("k".repeat(450));
        let documents = DocumentsService::new(executor).search(params).await.unwrap();
        assert_eq!(documents.len(), 1);

        let sent = transport.get_last_request().unwrap();
        assert_eq!(sent.method, HttpMethod::Post);
        let body: serde_json::Value = serde_json::from_str(&sent.body.unwrap()).unwrap();
        assert_eq!(body["keywords"].as_str().unwrap().len(), 400);
        assert_eq!(body["product"], json!(["lucidchart"]));
        assert!(body.get("createdStartTime").is_none());
    }

    #[tokio::test]
    async fn test_contents() {
        let (transport, executor) = executor(SCOPES);
        transport.queue_json_response(
            200,
            &json!({"id": "doc 1", "title": "Plan", "pages": [{"id": "p1"}]}),
        );

        let content = DocumentsService::new(executor).contents("doc 1").await.unwrap();
        assert_eq!(content.title.as_deref(), Some("Plan"));
        assert_eq!(content.pages.len(), 1);
        assert_eq!(
            transport.get_last_request().unwrap().url,
            "https://api.lucid.co/documents/doc%201/contents"
        );
    }

    #[tokio::test]
    async fn test_scope_checked_before_dispatch() {
        let (transport, executor) = executor("user.profile");
        let error = DocumentsService::new(executor).list(10).await.unwrap_err();
        assert_eq!(error.error_code(), "invalid_scopes");
        assert!(transport.get_requests().is_empty());
    }
}
