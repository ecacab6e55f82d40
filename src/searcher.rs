use crate::batch::{fetch_details, DroppedRecipe};
use crate::builder::SearcherBuilder;
use crate::config::SearchConfig;
use crate::fetchers::{
    RecipeFetcher, RecipeLookup, RequestFetcher, SummaryFetcher, SummaryLookup,
};
use crate::model::{RecipeDetail, SummaryResult};
use crate::normalize::normalize;
use crate::sink::ResultSink;
use crate::SearchError;
use log::{debug, error, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub const SEARCHING_STATUS: &str = "Searching recipes…";
pub const FAILED_STATUS: &str = "Something went wrong while fetching recipes. Please try again.";
const SUGGESTED_INGREDIENTS: &str = "chicken, paneer, tomato";

/// Where the searcher is in the life of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Searching,
    NoResults,
    ResultsReady,
    /// The recipe search step itself failed
    Failed,
}

#[derive(Debug)]
pub enum SummaryOutcome {
    Shown(SummaryResult),
    /// Lookup failed; the summary section is hidden
    Hidden(SearchError),
}

#[derive(Debug)]
pub enum RecipeOutcome {
    /// The search step matched nothing; no details were fetched
    NotFound,
    Found {
        /// Matches reported by the search step
        total: usize,
        /// Ids detail-fetched after capping at `max_results`
        shown: usize,
        recipes: Vec<RecipeDetail>,
        dropped: Vec<DroppedRecipe>,
    },
    Failed(SearchError),
}

/// Result of one query
#[derive(Debug)]
pub struct QueryReport {
    pub query: String,
    pub summary: SummaryOutcome,
    pub recipes: RecipeOutcome,
    pub phase: QueryPhase,
    /// A later query started before this one settled; its output was not shown
    pub superseded: bool,
}

pub fn not_found_status(query: &str) -> String {
    format!(
        "No recipes found for “{}”. Try another ingredient (e.g., {}).",
        query, SUGGESTED_INGREDIENTS
    )
}

pub fn found_status(total: usize, shown: usize) -> String {
    format!("Found {} recipe(s). Showing top {}.", total, shown)
}

/// Runs queries end to end: summary and recipes concurrently, recipes capped,
/// detail-fetched in groups, normalized and handed to a [`ResultSink`].
pub struct Searcher {
    summaries: Box<dyn SummaryLookup>,
    recipes: Box<dyn RecipeLookup>,
    max_results: usize,
    concurrency: usize,
    generation: AtomicU64,
    phase: Mutex<QueryPhase>,
}

impl Searcher {
    pub fn new(
        summaries: Box<dyn SummaryLookup>,
        recipes: Box<dyn RecipeLookup>,
        max_results: usize,
        concurrency: usize,
    ) -> Self {
        Self {
            summaries,
            recipes,
            max_results,
            concurrency,
            generation: AtomicU64::new(0),
            phase: Mutex::new(QueryPhase::Idle),
        }
    }

    /// Searcher talking to the HTTP services named in `config`
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Self::builder().config(config.clone()).build()
    }

    pub(crate) fn http(
        config: &SearchConfig,
        fetcher: RequestFetcher,
    ) -> (Box<dyn SummaryLookup>, Box<dyn RecipeLookup>) {
        (
            Box::new(SummaryFetcher::new(fetcher.clone(), config)),
            Box::new(RecipeFetcher::new(fetcher, config)),
        )
    }

    pub fn builder() -> SearcherBuilder {
        SearcherBuilder::default()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn phase(&self) -> QueryPhase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_phase(&self, phase: QueryPhase) {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner()) = phase;
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Run one query.
    ///
    /// # Errors
    /// Only [`SearchError::EmptyQuery`], for input that is empty after trimming; no
    /// service is contacted and the sink is not touched. Remote failures are
    /// reported through the returned [`QueryReport`] instead.
    pub async fn run(
        &self,
        query: &str,
        sink: &dyn ResultSink,
    ) -> Result<QueryReport, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty query");
            return Err(SearchError::EmptyQuery);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Searching for '{}'", query);
        self.set_phase(QueryPhase::Searching);
        sink.clear();
        sink.set_status(SEARCHING_STATUS);

        let (summary, recipes) = tokio::join!(
            self.load_summary(query, generation, sink),
            self.load_recipes(query, generation, sink)
        );

        let phase = match &recipes {
            RecipeOutcome::NotFound => QueryPhase::NoResults,
            RecipeOutcome::Found { .. } => QueryPhase::ResultsReady,
            RecipeOutcome::Failed(_) => QueryPhase::Failed,
        };
        let superseded = !self.is_current(generation);

        let report = QueryReport {
            query: query.to_string(),
            summary,
            recipes,
            phase,
            superseded,
        };

        if superseded {
            info!("Query '{}' was superseded, discarding its results", query);
        } else {
            self.set_phase(phase);
            sink.finish(&report);
        }
        Ok(report)
    }

    async fn load_summary(
        &self,
        query: &str,
        generation: u64,
        sink: &dyn ResultSink,
    ) -> SummaryOutcome {
        match self.summaries.summary(query).await {
            Ok(summary) => {
                if self.is_current(generation) {
                    sink.show_summary(&summary);
                }
                SummaryOutcome::Shown(summary)
            }
            Err(e) => {
                debug!("No summary for '{}': {}", query, e);
                if self.is_current(generation) {
                    sink.hide_summary();
                }
                SummaryOutcome::Hidden(e)
            }
        }
    }

    async fn load_recipes(
        &self,
        query: &str,
        generation: u64,
        sink: &dyn ResultSink,
    ) -> RecipeOutcome {
        let refs = match self.recipes.search(query).await {
            Ok(refs) => refs,
            Err(e) => {
                error!("Recipe search for '{}' failed: {}", query, e);
                if self.is_current(generation) {
                    sink.set_status(FAILED_STATUS);
                }
                return RecipeOutcome::Failed(e);
            }
        };

        if refs.is_empty() {
            info!("No recipes found for '{}'", query);
            if self.is_current(generation) {
                sink.set_status(&not_found_status(query));
            }
            return RecipeOutcome::NotFound;
        }

        let total = refs.len();
        let ids: Vec<String> = refs
            .into_iter()
            .take(self.max_results)
            .map(|r| r.id)
            .collect();
        if self.is_current(generation) {
            sink.set_status(&found_status(total, ids.len()));
        }

        let batch = fetch_details(self.recipes.as_ref(), &ids, self.concurrency).await;
        let recipes: Vec<RecipeDetail> = batch
            .records
            .iter()
            .map(|(id, raw)| normalize(raw, id))
            .collect();
        info!(
            "Loaded {} of {} recipe(s) for '{}'",
            recipes.len(),
            ids.len(),
            query
        );

        if self.is_current(generation) {
            for recipe in &recipes {
                sink.add_recipe_card(recipe);
            }
        }

        RecipeOutcome::Found {
            total,
            shown: ids.len(),
            recipes,
            dropped: batch.dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecipeRef;
    use crate::normalize::RawRecipe;
    use crate::sink::{RecordingSink, SinkEvent};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FakeSummaries {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SummaryLookup for FakeSummaries {
        async fn summary(&self, term: &str) -> Result<SummaryResult, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchError::StatusError {
                    url: format!("summary/{}", term),
                    status: 404,
                });
            }
            Ok(SummaryResult {
                title: term.to_string(),
                extract: format!("About {}", term),
                page_url: format!("https://wiki.example/{}", term),
                thumbnail_url: None,
            })
        }
    }

    #[derive(Default)]
    struct FakeRecipes {
        ids: Vec<String>,
        search_fails: bool,
        searches: AtomicUsize,
        lookups: Mutex<Vec<String>>,
        /// Search for this term waits until notified
        blocked: Option<(String, Arc<Notify>)>,
    }

    impl FakeRecipes {
        fn with_ids(count: usize) -> Self {
            FakeRecipes {
                ids: (1..=count).map(|i| i.to_string()).collect(),
                ..Default::default()
            }
        }

        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecipeLookup for FakeRecipes {
        async fn search(&self, ingredient: &str) -> Result<Vec<RecipeRef>, SearchError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            if let Some((term, notify)) = &self.blocked {
                if term == ingredient {
                    notify.notified().await;
                }
            }
            if self.search_fails {
                return Err(SearchError::StatusError {
                    url: "filter".to_string(),
                    status: 500,
                });
            }
            Ok(self
                .ids
                .iter()
                .map(|id| RecipeRef { id: id.clone() })
                .collect())
        }

        async fn lookup(&self, id: &str) -> Result<Option<RawRecipe>, SearchError> {
            self.lookups.lock().unwrap().push(id.to_string());
            let record = json!({ "idMeal": id, "strMeal": format!("Meal {}", id) });
            match record {
                Value::Object(fields) => Ok(Some(RawRecipe::from(fields))),
                _ => Ok(None),
            }
        }
    }

    /// Lets a test keep a handle on the fakes after boxing them into a searcher
    struct Shared<T>(Arc<T>);

    #[async_trait]
    impl SummaryLookup for Shared<FakeSummaries> {
        async fn summary(&self, term: &str) -> Result<SummaryResult, SearchError> {
            self.0.summary(term).await
        }
    }

    #[async_trait]
    impl RecipeLookup for Shared<FakeRecipes> {
        async fn search(&self, ingredient: &str) -> Result<Vec<RecipeRef>, SearchError> {
            self.0.search(ingredient).await
        }

        async fn lookup(&self, id: &str) -> Result<Option<RawRecipe>, SearchError> {
            self.0.lookup(id).await
        }
    }

    fn searcher(summaries: &Arc<FakeSummaries>, recipes: &Arc<FakeRecipes>) -> Searcher {
        Searcher::new(
            Box::new(Shared(summaries.clone())),
            Box::new(Shared(recipes.clone())),
            12,
            4,
        )
    }

    #[tokio::test]
    async fn test_whitespace_query_is_rejected_without_calls() {
        let summaries = Arc::new(FakeSummaries::default());
        let recipes = Arc::new(FakeRecipes::with_ids(3));
        let searcher = searcher(&summaries, &recipes);
        let sink = RecordingSink::new();

        for query in ["", "   ", "\t\n "] {
            let result = searcher.run(query, &sink).await;
            assert!(matches!(result, Err(SearchError::EmptyQuery)));
        }

        assert_eq!(summaries.calls.load(Ordering::SeqCst), 0);
        assert_eq!(recipes.searches.load(Ordering::SeqCst), 0);
        assert!(sink.events().is_empty());
        assert_eq!(searcher.phase(), QueryPhase::Idle);
    }

    #[tokio::test]
    async fn test_no_results_reports_query_and_skips_lookups() {
        let summaries = Arc::new(FakeSummaries::default());
        let recipes = Arc::new(FakeRecipes::default());
        let searcher = searcher(&summaries, &recipes);
        let sink = RecordingSink::new();

        let report = searcher.run("  dragonfruit ", &sink).await.unwrap();

        assert!(matches!(report.recipes, RecipeOutcome::NotFound));
        assert_eq!(report.phase, QueryPhase::NoResults);
        assert_eq!(report.query, "dragonfruit");
        let status = sink.status().unwrap();
        assert!(status.contains("“dragonfruit”"));
        assert!(status.contains("chicken, paneer, tomato"));
        assert!(recipes.lookups().is_empty());
        assert_eq!(searcher.phase(), QueryPhase::NoResults);
    }

    #[tokio::test]
    async fn test_results_are_capped_in_order() {
        let summaries = Arc::new(FakeSummaries::default());
        let recipes = Arc::new(FakeRecipes::with_ids(20));
        let searcher = searcher(&summaries, &recipes);
        let sink = RecordingSink::new();

        let report = searcher.run("chicken", &sink).await.unwrap();

        let expected: Vec<String> = (1..=12).map(|i| i.to_string()).collect();
        assert_eq!(recipes.lookups(), expected);
        match report.recipes {
            RecipeOutcome::Found { total, shown, recipes, dropped } => {
                assert_eq!(total, 20);
                assert_eq!(shown, 12);
                assert_eq!(recipes.len(), 12);
                assert!(dropped.is_empty());
            }
            other => panic!("expected recipes, got {:?}", other),
        }
        assert_eq!(sink.status().as_deref(), Some("Found 20 recipe(s). Showing top 12."));
        let shown: Vec<String> = sink.recipes().into_iter().map(|r| r.id).collect();
        assert_eq!(shown, expected);
        assert_eq!(sink.events().last(), Some(&SinkEvent::Finished));
    }

    #[tokio::test]
    async fn test_fewer_than_cap_fetches_all() {
        let summaries = Arc::new(FakeSummaries::default());
        let recipes = Arc::new(FakeRecipes::with_ids(5));
        let searcher = searcher(&summaries, &recipes);
        let sink = RecordingSink::new();

        searcher.run("paneer", &sink).await.unwrap();

        assert_eq!(recipes.lookups().len(), 5);
        assert_eq!(sink.status().as_deref(), Some("Found 5 recipe(s). Showing top 5."));
    }

    #[tokio::test]
    async fn test_summary_failure_is_isolated() {
        let summaries = Arc::new(FakeSummaries {
            fail: true,
            ..Default::default()
        });
        let recipes = Arc::new(FakeRecipes::with_ids(2));
        let searcher = searcher(&summaries, &recipes);
        let sink = RecordingSink::new();

        let report = searcher.run("tomato", &sink).await.unwrap();

        assert!(matches!(report.summary, SummaryOutcome::Hidden(_)));
        assert!(sink.summary_hidden());
        assert_eq!(sink.recipes().len(), 2);
        assert_eq!(report.phase, QueryPhase::ResultsReady);
    }

    #[tokio::test]
    async fn test_search_failure_shows_generic_status() {
        let summaries = Arc::new(FakeSummaries::default());
        let recipes = Arc::new(FakeRecipes {
            search_fails: true,
            ..FakeRecipes::with_ids(3)
        });
        let searcher = searcher(&summaries, &recipes);
        let sink = RecordingSink::new();

        let report = searcher.run("chicken", &sink).await.unwrap();

        assert!(matches!(report.recipes, RecipeOutcome::Failed(_)));
        assert_eq!(report.phase, QueryPhase::Failed);
        assert_eq!(sink.status().as_deref(), Some(FAILED_STATUS));
        assert!(sink.recipes().is_empty());
        assert!(recipes.lookups().is_empty());
        // The summary still made it through
        assert_eq!(sink.summary().map(|s| s.title).as_deref(), Some("chicken"));
    }

    #[tokio::test]
    async fn test_superseded_query_does_not_emit_results() {
        let notify = Arc::new(Notify::new());
        let summaries = Arc::new(FakeSummaries::default());
        let recipes = Arc::new(FakeRecipes {
            blocked: Some(("slow".to_string(), notify.clone())),
            ..FakeRecipes::with_ids(2)
        });
        let searcher = searcher(&summaries, &recipes);
        let sink = RecordingSink::new();

        let (first, second) = tokio::join!(searcher.run("slow", &sink), async {
            let report = searcher.run("fast", &sink).await;
            notify.notify_one();
            report
        });
        let first = first.unwrap();
        let second = second.unwrap();

        assert!(first.superseded);
        assert!(!second.superseded);
        // Both queries fetched, only the second one was displayed
        assert_eq!(recipes.lookups().len(), 4);
        assert_eq!(sink.recipes().len(), 2);
        let finished = sink
            .events()
            .iter()
            .filter(|e| **e == SinkEvent::Finished)
            .count();
        assert_eq!(finished, 1);
        assert_eq!(searcher.phase(), QueryPhase::ResultsReady);
    }
}
