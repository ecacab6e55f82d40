use super::{RecipeLookup, RequestFetcher};
use crate::config::SearchConfig;
use crate::model::RecipeRef;
use crate::normalize::RawRecipe;
use crate::SearchError;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::Value;

/// `{ "meals": [...] }`, where `meals` is `null` when nothing matched
#[derive(Debug, Deserialize)]
struct MealsEnvelope<T> {
    meals: Option<Vec<T>>,
}

/// Search hit; `idMeal` is kept loose so one bad entry cannot sink the search
#[derive(Debug, Deserialize)]
struct MealRef {
    #[serde(rename = "idMeal")]
    id_meal: Option<Value>,
}

/// Ids of the search hits in service order, skipping entries without a usable id
fn recipe_refs(envelope: MealsEnvelope<MealRef>) -> Vec<RecipeRef> {
    envelope
        .meals
        .unwrap_or_default()
        .into_iter()
        .filter_map(|meal| {
            let id = match meal.id_meal {
                Some(Value::String(id)) => id.trim().to_string(),
                Some(Value::Number(id)) => id.to_string(),
                _ => String::new(),
            };
            if id.is_empty() {
                debug!("Skipping search hit without an id");
                None
            } else {
                Some(RecipeRef { id })
            }
        })
        .collect()
}

/// TheMealDB-style recipe API: filter by ingredient, then look up by id
pub struct RecipeFetcher {
    fetcher: RequestFetcher,
    base_url: String,
}

impl RecipeFetcher {
    pub fn new(fetcher: RequestFetcher, config: &SearchConfig) -> Self {
        Self {
            fetcher,
            base_url: config.recipe_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn filter_url(&self, ingredient: &str) -> String {
        format!(
            "{}/filter.php?i={}",
            self.base_url,
            urlencoding::encode(ingredient)
        )
    }

    fn lookup_url(&self, id: &str) -> String {
        format!("{}/lookup.php?i={}", self.base_url, urlencoding::encode(id))
    }
}

#[async_trait]
impl RecipeLookup for RecipeFetcher {
    async fn search(&self, ingredient: &str) -> Result<Vec<RecipeRef>, SearchError> {
        let envelope: MealsEnvelope<MealRef> =
            self.fetcher.get_json(&self.filter_url(ingredient)).await?;

        let refs = recipe_refs(envelope);
        debug!("Ingredient '{}' matched {} recipe(s)", ingredient, refs.len());
        Ok(refs)
    }

    async fn lookup(&self, id: &str) -> Result<Option<RawRecipe>, SearchError> {
        let envelope: MealsEnvelope<Value> = self.fetcher.get_json(&self.lookup_url(id)).await?;

        // Only the first record counts; anything that is not an object is a miss
        let record = envelope
            .meals
            .and_then(|meals| meals.into_iter().next())
            .and_then(|meal| match meal {
                Value::Object(fields) => Some(RawRecipe::from(fields)),
                _ => None,
            });
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> RecipeFetcher {
        let config = SearchConfig {
            recipe_base_url: "https://recipes.example/api/".to_string(),
            ..SearchConfig::default()
        };
        let fetcher = RequestFetcher::new(config.request_timeout(), &config.user_agent).unwrap();
        RecipeFetcher::new(fetcher, &config)
    }

    #[test]
    fn test_endpoint_urls() {
        let fetcher = fetcher();
        assert_eq!(
            fetcher.filter_url("chicken breast"),
            "https://recipes.example/api/filter.php?i=chicken%20breast"
        );
        assert_eq!(
            fetcher.lookup_url("52772"),
            "https://recipes.example/api/lookup.php?i=52772"
        );
    }

    #[test]
    fn test_envelope_with_null_meals() {
        let envelope: MealsEnvelope<MealRef> = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(envelope.meals.is_none());

        let envelope: MealsEnvelope<MealRef> = serde_json::from_str("{}").unwrap();
        assert!(envelope.meals.is_none());
    }

    #[test]
    fn test_search_hits_without_id_are_skipped() {
        let envelope: MealsEnvelope<MealRef> = serde_json::from_str(
            r#"{"meals": [
                {"idMeal": "52772"},
                {"strMeal": "No id"},
                {"idMeal": null},
                {"idMeal": ["52773"]},
                {"idMeal": "  "},
                {"idMeal": 52795}
            ]}"#,
        )
        .unwrap();

        let ids: Vec<String> = recipe_refs(envelope).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["52772", "52795"]);
    }

    #[test]
    fn test_envelope_rejects_malformed_meals() {
        let result: Result<MealsEnvelope<MealRef>, _> =
            serde_json::from_str(r#"{"meals": "nope"}"#);
        assert!(result.is_err());
    }
}
