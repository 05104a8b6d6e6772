use crate::backend::CredentialSource;
use tracing::warn;

/// Incrementally loaded, searchable list of credential-type names.
///
/// The first page replaces the list; later pages are appended without duplicates. There are
/// more pages as long as the last page came back full.
#[derive(Debug, Clone)]
pub struct CredentialNamePager {
    page: u32,
    limit: u32,
    search: String,
    names: Vec<String>,
    has_more: bool,
}

impl CredentialNamePager {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            search: String::new(),
            names: Vec::new(),
            has_more: true,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Changes the search term and reloads from the first page.
    pub async fn set_search<S>(&mut self, source: &S, search: impl Into<String>)
    where
        S: CredentialSource + ?Sized,
    {
        self.search = search.into();
        self.load(source, 1).await;
    }

    /// Loads the first page for the current search term.
    pub async fn refresh<S>(&mut self, source: &S)
    where
        S: CredentialSource + ?Sized,
    {
        self.load(source, 1).await;
    }

    /// Appends the next page, if the previous one was full.
    pub async fn load_more<S>(&mut self, source: &S)
    where
        S: CredentialSource + ?Sized,
    {
        if self.has_more {
            self.load(source, self.page + 1).await;
        }
    }

    async fn load<S>(&mut self, source: &S, page: u32)
    where
        S: CredentialSource + ?Sized,
    {
        match source
            .fetch_credential_names(page, self.limit, &self.search)
            .await
        {
            Ok(batch) => {
                self.has_more = batch.len() == self.limit as usize;
                if page == 1 {
                    self.names = batch;
                } else {
                    for name in batch {
                        if !self.names.contains(&name) {
                            self.names.push(name);
                        }
                    }
                }
                self.page = page;
            }
            Err(e) => {
                warn!(page, search = %self.search, error = %e, "failed to fetch credential names");
            }
        }
    }
}
