use crate::model::{RecipeDetail, SummaryResult};
use crate::searcher::QueryReport;
use std::sync::Mutex;

/// Presentation layer a query reports into.
///
/// Methods take `&self` because the summary and recipe lookups of one query report
/// concurrently; implementations synchronize internally.
pub trait ResultSink: Send + Sync {
    /// A new query was accepted; drop whatever the previous one displayed
    fn clear(&self);
    fn set_status(&self, text: &str);
    fn show_summary(&self, summary: &SummaryResult);
    fn hide_summary(&self);
    fn add_recipe_card(&self, recipe: &RecipeDetail);
    /// The query settled. Not called for rejected queries.
    fn finish(&self, _report: &QueryReport) {}
}

/// Everything a [`RecordingSink`] was told, in call order
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Cleared,
    Status(String),
    Summary(SummaryResult),
    SummaryHidden,
    Recipe(RecipeDetail),
    Finished,
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: SinkEvent) {
        // A poisoned lock only means another reporter panicked mid-push
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Most recent status text
    pub fn status(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|event| match event {
            SinkEvent::Status(text) => Some(text),
            _ => None,
        })
    }

    pub fn recipes(&self) -> Vec<RecipeDetail> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Recipe(recipe) => Some(recipe),
                _ => None,
            })
            .collect()
    }

    pub fn summary(&self) -> Option<SummaryResult> {
        self.events().into_iter().rev().find_map(|event| match event {
            SinkEvent::Summary(summary) => Some(summary),
            _ => None,
        })
    }

    pub fn summary_hidden(&self) -> bool {
        self.events().contains(&SinkEvent::SummaryHidden)
    }
}

impl ResultSink for RecordingSink {
    fn clear(&self) {
        self.push(SinkEvent::Cleared);
    }

    fn set_status(&self, text: &str) {
        self.push(SinkEvent::Status(text.to_string()));
    }

    fn show_summary(&self, summary: &SummaryResult) {
        self.push(SinkEvent::Summary(summary.clone()));
    }

    fn hide_summary(&self) {
        self.push(SinkEvent::SummaryHidden);
    }

    fn add_recipe_card(&self, recipe: &RecipeDetail) {
        self.push(SinkEvent::Recipe(recipe.clone()));
    }

    fn finish(&self, _report: &QueryReport) {
        self.push(SinkEvent::Finished);
    }
}
