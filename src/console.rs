use crate::model::{RecipeDetail, SummaryResult};
use crate::sink::ResultSink;
use std::io::{self, Write};

/// Plain-text rendering of a recipe card
pub fn format_card(recipe: &RecipeDetail) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {}\n", recipe.name));

    let meta = recipe.meta_line();
    if !meta.is_empty() {
        out.push_str(&format!("{}\n", meta));
    }
    if !recipe.image_url.is_empty() {
        out.push_str(&format!("Image: {}\n", recipe.image_url));
    }

    out.push_str("\nIngredients:\n");
    for ingredient in &recipe.ingredients {
        out.push_str(&format!("  - {}\n", ingredient));
    }

    out.push_str("\nInstructions:\n");
    out.push_str(recipe.display_instructions());
    out.push('\n');

    out.push_str(&format!("\nWatch: {}\n", recipe.watch_link));
    if let Some(embed) = &recipe.embeddable_video_url {
        out.push_str(&format!("Player: {}\n", embed));
    }
    out.push_str(&format!(
        "{}: {}\n",
        recipe.source_link.label, recipe.source_link.url
    ));
    out
}

pub fn format_summary(summary: &SummaryResult) -> String {
    let mut out = format!(
        "# {}\n\n{}\n\nRead more: {}\n",
        summary.title, summary.extract, summary.page_url
    );
    if let Some(thumbnail) = &summary.thumbnail_url {
        out.push_str(&format!("Image: {}\n", thumbnail));
    }
    out
}

/// Sink that prints to stdout as results arrive
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    fn print(&self, text: &str) {
        // Nothing useful can be done if stdout is gone
        let _ = writeln!(io::stdout().lock(), "{}", text);
    }
}

impl ResultSink for ConsoleSink {
    fn clear(&self) {}

    fn set_status(&self, text: &str) {
        self.print(&format!("> {}", text));
    }

    fn show_summary(&self, summary: &SummaryResult) {
        self.print(&format_summary(summary));
    }

    fn hide_summary(&self) {}

    fn add_recipe_card(&self, recipe: &RecipeDetail) {
        self.print(&format_card(recipe));
    }
}
