use std::time::Duration;

use crate::config::SearchConfig;
use crate::fetchers::{RecipeLookup, RequestFetcher, SummaryLookup};
use crate::{SearchError, Searcher};

/// Builder for configuring a [`Searcher`]
#[derive(Default)]
pub struct SearcherBuilder {
    config: Option<SearchConfig>,
    max_results: Option<usize>,
    concurrency: Option<usize>,
    timeout: Option<Duration>,
    summary_base_url: Option<String>,
    recipe_base_url: Option<String>,
    summary_lookup: Option<Box<dyn SummaryLookup>>,
    recipe_lookup: Option<Box<dyn RecipeLookup>>,
}

impl SearcherBuilder {
    /// Start from an existing configuration instead of the defaults
    ///
    /// # Example
    /// ```no_run
    /// use pantry_search::{SearchConfig, Searcher};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let searcher = Searcher::builder().config(SearchConfig::load()?).build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Cap the number of recipes fetched per query
    ///
    /// # Example
    /// ```
    /// use pantry_search::Searcher;
    ///
    /// let builder = Searcher::builder().max_results(6);
    /// ```
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Number of detail lookups issued at once
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use pantry_search::Searcher;
    /// use std::time::Duration;
    ///
    /// let builder = Searcher::builder().timeout(Duration::from_secs(5));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Point the summary lookup at another host (e.g. a test server)
    pub fn summary_base_url(mut self, url: impl Into<String>) -> Self {
        self.summary_base_url = Some(url.into());
        self
    }

    /// Point the recipe lookups at another host (e.g. a test server)
    pub fn recipe_base_url(mut self, url: impl Into<String>) -> Self {
        self.recipe_base_url = Some(url.into());
        self
    }

    /// Use a custom summary lookup instead of the HTTP one
    pub fn summary_lookup(mut self, lookup: impl SummaryLookup + 'static) -> Self {
        self.summary_lookup = Some(Box::new(lookup));
        self
    }

    /// Use a custom recipe lookup instead of the HTTP one
    pub fn recipe_lookup(mut self, lookup: impl RecipeLookup + 'static) -> Self {
        self.recipe_lookup = Some(Box::new(lookup));
        self
    }

    /// Build the searcher
    ///
    /// # Errors
    /// Returns `SearchError::BuilderError` if `max_results`, `concurrency` or the
    /// request timeout is zero,
    /// and `SearchError::FetchError` if the HTTP client cannot be created.
    pub fn build(self) -> Result<Searcher, SearchError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(max_results) = self.max_results {
            config.max_results = max_results;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(url) = self.summary_base_url {
            config.summary_base_url = url;
        }
        if let Some(url) = self.recipe_base_url {
            config.recipe_base_url = url;
        }

        if config.max_results == 0 {
            return Err(SearchError::BuilderError(
                "max_results must be at least 1".to_string(),
            ));
        }
        if config.concurrency == 0 {
            return Err(SearchError::BuilderError(
                "concurrency must be at least 1".to_string(),
            ));
        }
        let timeout = self.timeout.unwrap_or_else(|| config.request_timeout());
        if timeout.is_zero() {
            return Err(SearchError::BuilderError(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let (summaries, recipes) = match (self.summary_lookup, self.recipe_lookup) {
            (Some(summaries), Some(recipes)) => (summaries, recipes),
            (summary_lookup, recipe_lookup) => {
                let fetcher = RequestFetcher::new(timeout, &config.user_agent)?;
                let (summaries, recipes) = Searcher::http(&config, fetcher);
                (
                    summary_lookup.unwrap_or(summaries),
                    recipe_lookup.unwrap_or(recipes),
                )
            }
        };

        Ok(Searcher::new(
            summaries,
            recipes,
            config.max_results,
            config.concurrency,
        ))
    }
}
