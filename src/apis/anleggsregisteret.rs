//! The paginated facility feed: the live registry endpoint and a local-file
//! variant backing the CLI's source-file override.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::constants::{FACILITY_API_URL, PAGE_SIZE, USER_AGENT};
use crate::error::Result;
use crate::types::FacilityPage;

/// A source of facility pages. Pages are requested in order until one is
/// marked last.
#[async_trait::async_trait]
pub trait FacilityFeed: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<FacilityPage>;
}

/// The live Anleggsregisteret feed.
pub struct RegistryFeed {
    client: reqwest::Client,
}

impl Default for RegistryFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryFeed {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl FacilityFeed for RegistryFeed {
    async fn fetch_page(&self, page: u32) -> Result<FacilityPage> {
        let url = format!("{FACILITY_API_URL}?page={page}&size={PAGE_SIZE}&");
        debug!("Fetching facility page {} from {}", page, url);

        let page: FacilityPage = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Received {} facilities, last={}", page.content.len(), page.last);
        Ok(page)
    }
}

/// A feed backed by a local JSON file, used instead of the registry when the
/// operator passes a file name. The file may hold either one page document
/// or a bare array of facilities; both are served as a single final page.
pub struct FileFeed {
    page: FacilityPage,
}

impl FileFeed {
    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Reading facilities from {}", path.display());
        let text = fs::read_to_string(path)?;
        let page = match serde_json::from_str::<FacilityPage>(&text) {
            Ok(page) => FacilityPage {
                last: true,
                ..page
            },
            Err(_) => FacilityPage {
                content: serde_json::from_str(&text)?,
                last: true,
            },
        };
        Ok(Self { page })
    }
}

#[async_trait::async_trait]
impl FacilityFeed for FileFeed {
    async fn fetch_page(&self, _page: u32) -> Result<FacilityPage> {
        Ok(self.page.clone())
    }
}
