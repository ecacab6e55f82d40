use serde::Serialize;
use std::fmt;

/// Text shown in place of an empty ingredient list
pub const NO_INGREDIENTS: &str = "No ingredients listed.";

/// Text shown in place of empty instructions
pub const NO_INSTRUCTIONS: &str = "No instructions available.";

/// Encyclopedia summary for the query term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    pub title: String,
    pub extract: String,
    pub page_url: String,
    pub thumbnail_url: Option<String>,
}

/// Recipe identifier as returned by the search step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub item: String,
    pub measure: Option<String>,
}

impl Ingredient {
    /// The single entry used when a recipe lists no ingredients
    pub fn none_listed() -> Self {
        Ingredient {
            item: NO_INGREDIENTS.to_string(),
            measure: None,
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.measure {
            Some(measure) => write!(f, "{} — {}", self.item, measure),
            None => write!(f, "{}", self.item),
        }
    }
}

/// A labeled outbound link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
    pub label: String,
}

/// Display-ready recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeDetail {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub image_url: String,
    pub instructions: String,
    pub ingredients: Vec<Ingredient>,
    /// Raw video link, kept only when it is an http(s) URL
    pub video_url: Option<String>,
    pub embeddable_video_url: Option<String>,
    pub source_url: Option<String>,
    /// Where the "watch" button points; a video search when there is no video
    pub watch_link: String,
    pub source_link: Link,
}

impl RecipeDetail {
    /// Category and area joined for the card subtitle
    pub fn meta_line(&self) -> String {
        [self.category.as_deref(), self.area.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" • ")
    }

    pub fn display_instructions(&self) -> &str {
        if self.instructions.is_empty() {
            NO_INSTRUCTIONS
        } else {
            &self.instructions
        }
    }
}
