use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::ClientError;
use crate::http::{ArmConnection, Response};

/// Cap on pages fetched per continuation loop, guarding against a backend
/// that never returns an empty token.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// One page of a list result: an ordered sequence of resources plus the
/// opaque continuation token. A missing or empty token means exhausted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(default)]
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    /// True when no further page exists.
    pub fn is_last(&self) -> bool {
        self.next_link.as_deref().map_or(true, str::is_empty)
    }
}

impl ArmConnection {
    /// Fetch a single page. `url` is either the initial list URL or a
    /// continuation token from a prior page, replayed verbatim.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Response<Page<T>>, ClientError> {
        self.get(url).await
    }

    /// Run the continuation loop: fetch the first page, then follow
    /// `next_link` until it is empty or absent, appending each page's items
    /// in order. Iteration is capped at the connection's page limit.
    pub async fn list_all_pages<T: DeserializeOwned>(
        &self,
        first_url: &str,
    ) -> Result<Vec<T>, ClientError> {
        let max_pages = self.page_limit();

        let first = self.get_page::<T>(first_url).await?.body;
        let mut next_link = first.next_link.clone();
        let mut items = first.value;
        let mut pages = 1usize;

        while let Some(link) = next_link.take().filter(|l| !l.is_empty()) {
            if pages >= max_pages {
                return Err(ClientError::PageLimitExceeded { max_pages });
            }
            let page = self.get_page::<T>(&link).await?.body;
            debug!(page = pages + 1, items = page.value.len(), "continuation page");
            next_link = page.next_link.clone();
            items.extend(page.value);
            pages += 1;
        }

        Ok(items)
    }
}
