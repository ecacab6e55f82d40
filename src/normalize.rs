//! Turns loosely-typed recipe records into display-ready [`RecipeDetail`]s.

use crate::model::{Ingredient, Link, RecipeDetail};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// Number of numbered ingredient/measure field pairs in a recipe record
pub const INGREDIENT_SLOTS: usize = 20;

const VIDEO_SEARCH_URL: &str = "https://www.youtube.com/results";
const VIDEO_EMBED_URL: &str = "https://www.youtube.com/embed";
const WEB_SEARCH_URL: &str = "https://www.google.com/search";

/// Recipe record as returned by the lookup endpoint.
///
/// Every field may be missing, `null` or an empty string, so values are kept as
/// raw JSON and coerced to strings on access.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecipe {
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl RawRecipe {
    /// Field value as a trimmed string; anything but a JSON string reads as empty
    pub fn field(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("")
    }

    pub fn id(&self) -> &str {
        self.field("idMeal")
    }

    pub fn name(&self) -> &str {
        self.field("strMeal")
    }

    /// The numbered ingredient fields as an ordered sequence of (item, measure)
    pub fn ingredient_pairs(&self) -> Vec<(&str, &str)> {
        (1..=INGREDIENT_SLOTS)
            .map(|i| {
                (
                    self.field(&format!("strIngredient{}", i)),
                    self.field(&format!("strMeasure{}", i)),
                )
            })
            .collect()
    }
}

impl From<Map<String, Value>> for RawRecipe {
    fn from(fields: Map<String, Value>) -> Self {
        RawRecipe { fields }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Normalize one raw record.
///
/// `fallback_id` is used when the record does not carry its own id.
pub fn normalize(raw: &RawRecipe, fallback_id: &str) -> RecipeDetail {
    let name = raw.name().to_string();
    let raw_video = raw.field("strYoutube");
    let raw_source = raw.field("strSource");

    let id = match raw.id() {
        "" => fallback_id.to_string(),
        id => id.to_string(),
    };

    RecipeDetail {
        id,
        category: non_empty(raw.field("strCategory")),
        area: non_empty(raw.field("strArea")),
        image_url: raw.field("strMealThumb").to_string(),
        instructions: raw.field("strInstructions").to_string(),
        ingredients: extract_ingredients(raw),
        video_url: is_web_url(raw_video).then(|| raw_video.to_string()),
        embeddable_video_url: embeddable_video_url(raw_video),
        source_url: non_empty(raw_source),
        watch_link: watch_link(raw_video, &name),
        source_link: source_link(raw_source, &name),
        name,
    }
}

/// Ingredient list with empty items skipped, or the "none listed" sentinel
pub fn extract_ingredients(raw: &RawRecipe) -> Vec<Ingredient> {
    let items: Vec<Ingredient> = raw
        .ingredient_pairs()
        .into_iter()
        .filter(|(item, _)| !item.is_empty())
        .map(|(item, measure)| Ingredient {
            item: item.to_string(),
            measure: non_empty(measure),
        })
        .collect();

    if items.is_empty() {
        vec![Ingredient::none_listed()]
    } else {
        items
    }
}

fn is_web_url(raw: &str) -> bool {
    raw.starts_with("http")
}

/// The raw video link if usable, otherwise a video search for the recipe
pub fn watch_link(raw_video: &str, name: &str) -> String {
    if is_web_url(raw_video) {
        raw_video.to_string()
    } else {
        format!(
            "{}?search_query={}",
            VIDEO_SEARCH_URL,
            urlencoding::encode(&format!("{} recipe", name))
        )
    }
}

/// Player URL built from the `v` parameter of a shareable video link
pub fn embeddable_video_url(raw_video: &str) -> Option<String> {
    if raw_video.is_empty() {
        return None;
    }
    let url = Url::parse(raw_video).ok()?;
    let id = url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())?;

    Some(format!("{}/{}", VIDEO_EMBED_URL, id))
}

pub fn source_link(raw_source: &str, name: &str) -> Link {
    if raw_source.is_empty() {
        Link {
            url: format!(
                "{}?q={}",
                WEB_SEARCH_URL,
                urlencoding::encode(&format!("{} recipe", name))
            ),
            label: "Search this recipe".to_string(),
        }
    } else {
        Link {
            url: raw_source.to_string(),
            label: "Original Source".to_string(),
        }
    }
}
