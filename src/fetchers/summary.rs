use super::{RequestFetcher, SummaryLookup};
use crate::config::SearchConfig;
use crate::model::SummaryResult;
use crate::SearchError;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

const NO_SUMMARY: &str = "No summary available.";

#[derive(Debug, Default, Deserialize)]
struct SummaryResponse {
    title: Option<String>,
    extract: Option<String>,
    content_urls: Option<ContentUrls>,
    thumbnail: Option<Image>,
    originalimage: Option<Image>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrls>,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Image {
    source: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Encyclopedia page summaries (MediaWiki REST `page/summary`)
pub struct SummaryFetcher {
    fetcher: RequestFetcher,
    base_url: String,
    page_base_url: String,
}

impl SummaryFetcher {
    pub fn new(fetcher: RequestFetcher, config: &SearchConfig) -> Self {
        Self {
            fetcher,
            base_url: config.summary_base_url.trim_end_matches('/').to_string(),
            page_base_url: config.summary_page_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn summary_url(&self, term: &str) -> String {
        format!("{}/summary/{}", self.base_url, urlencoding::encode(term))
    }

    fn to_result(&self, term: &str, response: SummaryResponse) -> SummaryResult {
        let page_url = non_empty(
            response
                .content_urls
                .and_then(|urls| urls.desktop)
                .and_then(|desktop| desktop.page),
        )
        .unwrap_or_else(|| format!("{}/{}", self.page_base_url, urlencoding::encode(term)));

        let thumbnail_url = non_empty(response.thumbnail.and_then(|image| image.source))
            .or_else(|| non_empty(response.originalimage.and_then(|image| image.source)));

        SummaryResult {
            title: non_empty(response.title).unwrap_or_else(|| term.to_string()),
            extract: non_empty(response.extract).unwrap_or_else(|| NO_SUMMARY.to_string()),
            page_url,
            thumbnail_url,
        }
    }
}

#[async_trait]
impl SummaryLookup for SummaryFetcher {
    async fn summary(&self, term: &str) -> Result<SummaryResult, SearchError> {
        let response: SummaryResponse = self.fetcher.get_json(&self.summary_url(term)).await?;
        debug!("Summary for '{}': {:?}", term, response.title);
        Ok(self.to_result(term, response))
    }
}
