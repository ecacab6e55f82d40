//! Bounded-concurrency detail fetching.
//!
//! Ids are split into consecutive groups of at most `concurrency`; the lookups of
//! one group run together and the next group starts only once every lookup of the
//! current one has settled. A failed or missing id is dropped without failing the
//! batch, and the surviving records keep the input order.

use crate::fetchers::RecipeLookup;
use crate::normalize::RawRecipe;
use crate::SearchError;
use futures::future::join_all;
use log::{debug, error, warn};

/// Why an id is absent from the batch output
#[derive(Debug)]
pub enum DropReason {
    /// The service answered but had no record for the id
    NotFound,
    /// The lookup itself failed (network, status, body)
    Failed(SearchError),
}

#[derive(Debug)]
pub struct DroppedRecipe {
    pub id: String,
    pub reason: DropReason,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Resolved records paired with the id they were requested by, in input order
    pub records: Vec<(String, RawRecipe)>,
    pub dropped: Vec<DroppedRecipe>,
}

pub async fn fetch_details(
    lookup: &dyn RecipeLookup,
    ids: &[String],
    concurrency: usize,
) -> BatchOutcome {
    let group_size = concurrency.max(1);
    let mut outcome = BatchOutcome::default();

    for (index, group) in ids.chunks(group_size).enumerate() {
        debug!("Fetching group {} ({} id(s))", index + 1, group.len());

        // join_all yields results in input order whatever the completion order
        let results = join_all(group.iter().map(|id| lookup.lookup(id))).await;

        for (id, result) in group.iter().zip(results) {
            match result {
                Ok(Some(record)) => outcome.records.push((id.clone(), record)),
                Ok(None) => {
                    debug!("Recipe {} not found, skipping", id);
                    outcome.dropped.push(DroppedRecipe {
                        id: id.clone(),
                        reason: DropReason::NotFound,
                    });
                }
                Err(e) => {
                    if e.is_transient() {
                        warn!("Failed to fetch recipe {}: {}", id, e);
                    } else {
                        error!("Failed to fetch recipe {}: {}", id, e);
                    }
                    outcome.dropped.push(DroppedRecipe {
                        id: id.clone(),
                        reason: DropReason::Failed(e),
                    });
                }
            }
        }
    }

    outcome
}
