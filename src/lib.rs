pub mod batch;
pub mod builder;
pub mod config;
pub mod console;
pub mod error;
pub mod fetchers;
pub mod model;
pub mod normalize;
pub mod searcher;
pub mod sink;

pub use builder::SearcherBuilder;
pub use config::SearchConfig;
pub use error::SearchError;
pub use model::{Ingredient, Link, RecipeDetail, RecipeRef, SummaryResult};
pub use searcher::{QueryPhase, QueryReport, RecipeOutcome, Searcher, SummaryOutcome};
pub use sink::{RecordingSink, ResultSink, SinkEvent};

/// Run one query with configuration from `config.toml` and `PANTRY__*` variables.
///
/// Results are collected in memory and returned in the [`QueryReport`].
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = pantry_search::search("chicken").await?;
/// if let pantry_search::RecipeOutcome::Found { recipes, .. } = report.recipes {
///     for recipe in recipes {
///         println!("{}", recipe.name);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str) -> Result<QueryReport, SearchError> {
    let searcher = Searcher::from_config(&SearchConfig::load()?)?;
    searcher.run(query, &RecordingSink::new()).await
}

/// Run one query, reporting into `sink` as results arrive
pub async fn search_with_sink(
    query: &str,
    sink: &dyn ResultSink,
) -> Result<QueryReport, SearchError> {
    let searcher = Searcher::from_config(&SearchConfig::load()?)?;
    searcher.run(query, sink).await
}
