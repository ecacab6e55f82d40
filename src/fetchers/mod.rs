mod recipes;
mod request;
mod summary;

pub use recipes::RecipeFetcher;
pub use request::RequestFetcher;
pub use summary::SummaryFetcher;

use crate::model::{RecipeRef, SummaryResult};
use crate::normalize::RawRecipe;
use crate::SearchError;
use async_trait::async_trait;

/// Term to encyclopedia summary
#[async_trait]
pub trait SummaryLookup: Send + Sync {
    async fn summary(&self, term: &str) -> Result<SummaryResult, SearchError>;
}

/// Two-step recipe service: search by ingredient, then look up each id
#[async_trait]
pub trait RecipeLookup: Send + Sync {
    /// Ids of recipes using `ingredient`, in service order. Empty when nothing matched.
    async fn search(&self, ingredient: &str) -> Result<Vec<RecipeRef>, SearchError>;

    /// Full record for `id`, or `None` when the service has no such recipe
    async fn lookup(&self, id: &str) -> Result<Option<RawRecipe>, SearchError>;
}
