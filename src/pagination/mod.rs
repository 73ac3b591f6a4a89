//! Pagination
//!
//! Link-header driven traversal of collection resources.

use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::client::{ApiRequest, ApiResponse, RequestExecutor};
use crate::error::{LucidError, LucidResult};

/// Provider ceiling on items per page.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Query parameter carrying the page size.
pub const PAGE_SIZE_PARAM: &str = "pageSize";

/// Selects the items sub-structure of a page body.
pub type Extractor = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// Pagination links parsed from a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationLinks {
    pub next: Option<String>,
    pub prev: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
}

impl PaginationLinks {
    /// Parse comma-separated `<url>; rel="..."` entries.
    pub fn from_header(header_value: &str) -> Self {
        let mut links = Self::default();

        for part in header_value.split(',') {
            let mut url = None;
            let mut rel = None;

            for segment in part.split(';') {
                let segment = segment.trim();
                if segment.starts_with('<') && segment.ends_with('>') {
                    url = Some(segment[1..segment.len() - 1].to_string());
                } else if let Some(value) = segment.strip_prefix("rel=") {
                    rel = Some(value.trim_matches('"').to_string());
                }
            }

            if let (Some(url), Some(rel)) = (url, rel) {
                match rel.as_str() {
                    "next" => links.next = Some(url),
                    "prev" => links.prev = Some(url),
                    "first" => links.first = Some(url),
                    "last" => links.last = Some(url),
                    _ => {}
                }
            }
        }

        links
    }

    /// Links of a response, empty when it has no `Link` header.
    pub fn from_response(response: &ApiResponse) -> Self {
        response
            .header("link")
            .map(Self::from_header)
            .unwrap_or_default()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Traversal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    /// More pages may follow.
    Fetching,
    /// The last page had no next link.
    Done,
    /// A page fetch failed or the deadline ran out; pages already seen are kept.
    Aborted,
}

/// Walks a collection resource page by page.
pub struct Paginator {
    executor: RequestExecutor,
    request: ApiRequest,
    page_size: u32,
    extractor: Extractor,
    deadline: Option<Duration>,
}

impl Paginator {
    /// Paginate `request` with the maximum page size and the whole body as items.
    pub fn new(executor: RequestExecutor, request: ApiRequest) -> Self {
        Self {
            executor,
            request,
            page_size: MAX_PAGE_SIZE,
            extractor: Arc::new(|body: &Value| Some(body.clone())),
            deadline: None,
        }
    }

    /// Requested page size, silently clamped to [`MAX_PAGE_SIZE`].
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.min(MAX_PAGE_SIZE);
        self
    }

    pub fn with_extractor<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Take items from a top-level field of each page.
    pub fn with_field(self, field: &'static str) -> Self {
        self.with_extractor(move |body| body.get(field).cloned())
    }

    /// Bound the whole traversal.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Page-at-a-time traversal yielding raw page responses.
    pub fn pages(self) -> PageStream {
        let first = self
            .request
            .with_query(PAGE_SIZE_PARAM, self.page_size);

        PageStream {
            executor: self.executor,
            next: Some(first),
            state: PaginationState::Fetching,
            // A deadline too far out to represent is no deadline.
            deadline: self
                .deadline
                .and_then(|d| Instant::now().checked_add(d).map(|at| (d, at))),
            pages_fetched: 0,
        }
    }

    /// Fetch every page and concatenate the extracted items in order.
    ///
    /// A failed page fetch ends traversal and returns what was collected. Items that
    /// do not deserialize into `T` are a parse error.
    pub async fn collect<T: DeserializeOwned>(self) -> LucidResult<Vec<T>> {
        let extractor = self.extractor.clone();
        let mut pages = self.pages();
        let mut items = Vec::new();

        while let Some(page) = pages.next_page().await {
            items.extend(extract_items::<T>(&extractor, &page.body)?);
        }

        debug!(
            pages = pages.pages_fetched(),
            items = items.len(),
            state = ?pages.state(),
            "Pagination finished"
        );
        Ok(items)
    }
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("request", &self.request)
            .field("page_size", &self.page_size)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

/// Lazy page sequence. Shares termination rules with [`Paginator::collect`].
#[derive(Debug)]
pub struct PageStream {
    executor: RequestExecutor,
    next: Option<ApiRequest>,
    state: PaginationState,
    deadline: Option<(Duration, Instant)>,
    pages_fetched: usize,
}

impl PageStream {
    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page, or `None` once traversal is done or aborted.
    pub async fn next_page(&mut self) -> Option<ApiResponse> {
        if self.state != PaginationState::Fetching {
            return None;
        }
        let Some(mut request) = self.next.take() else {
            self.state = PaginationState::Done;
            return None;
        };

        if let Some((budget, at)) = self.deadline {
            let remaining = at.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(deadline = ?budget, "Pagination deadline exceeded");
                self.state = PaginationState::Aborted;
                return None;
            }
            request.deadline = Some(request.deadline.map_or(remaining, |d| d.min(remaining)));
        }

        let Some(response) = self.executor.execute_tolerant(&request).await else {
            warn!(
                url = %request.url,
                pages = self.pages_fetched,
                "Page fetch failed; stopping pagination"
            );
            self.state = PaginationState::Aborted;
            return None;
        };
        self.pages_fetched += 1;

        match PaginationLinks::from_response(&response).next {
            Some(url) => {
                debug!(next = %url, "Following next page link");
                self.next = Some(request.follow(url));
            }
            None => self.state = PaginationState::Done,
        }

        Some(response)
    }

    /// Adapt into a [`Stream`] of page responses.
    pub fn into_stream(self) -> impl Stream<Item = ApiResponse> + Send {
        stream::unfold(self, |mut pages| async move {
            pages.next_page().await.map(|page| (page, pages))
        })
    }
}

/// Apply an extractor to a page body. Null or absent means no items; a single
/// object counts as one item.
pub fn extract_items<T: DeserializeOwned>(
    extractor: &Extractor,
    body: &Value,
) -> LucidResult<Vec<T>> {
    let parse =
        |e: serde_json::Error| LucidError::parse(format!("Failed to parse page items: {}", e));

    match extractor(body) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(parse))
            .collect(),
        Some(value) => Ok(vec![serde_json::from_value(value).map_err(parse)?]),
    }
}
