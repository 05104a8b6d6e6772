//! Paginated, searchable listing of the node types offered by the backend.
//!
//! Fetching is split in two: the browser hands out a [`FetchRequest`] for its current
//! state, and the response is later fed back through [`CatalogBrowser::apply`]. Each
//! request carries a sequence number; a response older than the newest one already settled
//! (applied or failed) is discarded, so a slow stale search can never overwrite newer
//! results. A failed fetch
//! leaves the last good page on display.

use crate::backend::CatalogSource;
use crate::error::ClientError;
use crate::schema::NodeTypeDescriptor;
use tracing::{debug, warn};

mod debounce;

pub use debounce::SearchDebouncer;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of the node-type catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub entries: Vec<NodeTypeDescriptor>,
    pub total_pages: u32,
}

/// A catalog fetch issued by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub search: String,
    pub page: u32,
    pub limit: u32,
}

/// What happened to a response handed to [`CatalogBrowser::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The response replaced the displayed page.
    Applied,
    /// A newer response was already applied; this one was dropped.
    Stale,
    /// The fetch failed; the previous page stays.
    Failed,
}

#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    page: u32,
    page_size: u32,
    total_pages: u32,
    search: String,
    entries: Vec<NodeTypeDescriptor>,
    next_seq: u64,
    last_issued: Option<u64>,
    last_applied: Option<u64>,
    last_settled: Option<u64>,
}

impl Default for CatalogBrowser {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CatalogBrowser {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            total_pages: 1,
            search: String::new(),
            entries: Vec::new(),
            next_seq: 0,
            last_issued: None,
            last_applied: None,
            last_settled: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Entries of the last successfully applied page.
    pub fn entries(&self) -> &[NodeTypeDescriptor] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&NodeTypeDescriptor> {
        self.entries.get(index)
    }

    /// Whether the newest issued request has not come back yet.
    pub fn is_loading(&self) -> bool {
        match (self.last_issued, self.last_settled) {
            (Some(issued), Some(settled)) => settled < issued,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Issues a request for the current search term and page.
    pub fn request(&mut self) -> FetchRequest {
        self.next_seq += 1;
        self.last_issued = Some(self.next_seq);
        FetchRequest {
            seq: self.next_seq,
            search: self.search.clone(),
            page: self.page,
            limit: self.page_size,
        }
    }

    /// Changes the search term, going back to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) -> FetchRequest {
        self.search = search.into();
        self.page = 1;
        self.request()
    }

    /// Moves forward one page; `None` on the last page.
    pub fn next_page(&mut self) -> Option<FetchRequest> {
        if self.page >= self.total_pages {
            return None;
        }
        self.page += 1;
        Some(self.request())
    }

    /// Moves back one page; `None` on the first page.
    pub fn previous_page(&mut self) -> Option<FetchRequest> {
        if self.page <= 1 {
            return None;
        }
        self.page -= 1;
        Some(self.request())
    }

    /// Feeds back the response to `request`.
    pub fn apply(
        &mut self,
        request: &FetchRequest,
        result: Result<CatalogPage, ClientError>,
    ) -> ApplyOutcome {
        if self.last_settled.is_some_and(|last| request.seq < last) {
            debug!(
                seq = request.seq,
                search = %request.search,
                "discarding stale catalog response"
            );
            return ApplyOutcome::Stale;
        }
        self.last_settled = self.last_settled.max(Some(request.seq));

        match result {
            Ok(page) => {
                debug!(
                    seq = request.seq,
                    page = request.page,
                    entries = page.entries.len(),
                    "catalog page applied"
                );
                self.entries = page.entries;
                self.total_pages = page.total_pages.max(1);
                self.last_applied = Some(request.seq);
                ApplyOutcome::Applied
            }
            Err(e) => {
                warn!(
                    seq = request.seq,
                    search = %request.search,
                    page = request.page,
                    error = %e,
                    "failed to fetch node catalog; keeping previous page"
                );
                ApplyOutcome::Failed
            }
        }
    }

    /// Fetches `request` from `source` and applies the response.
    pub async fn fetch<S>(&mut self, source: &S, request: FetchRequest) -> ApplyOutcome
    where
        S: CatalogSource + ?Sized,
    {
        let result = source
            .fetch_catalog(&request.search, request.page, request.limit)
            .await;
        self.apply(&request, result)
    }

    /// Issues a request for the current state and fetches it.
    pub async fn refresh<S>(&mut self, source: &S) -> ApplyOutcome
    where
        S: CatalogSource + ?Sized,
    {
        let request = self.request();
        self.fetch(source, request).await
    }
}
