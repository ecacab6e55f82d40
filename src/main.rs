use log::{debug, info};
use pantry_search::console::ConsoleSink;
use pantry_search::{QueryPhase, SearchConfig, Searcher};
use std::env;

const DEFAULT_QUERY: &str = "chicken";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Everything after the program name is one query; search the default when empty
    let args: Vec<String> = env::args().skip(1).collect();
    let query = if args.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        args.join(" ")
    };

    let config = SearchConfig::load()?;
    debug!("{:#?}", config);
    let searcher = Searcher::from_config(&config)?;

    let report = searcher.run(&query, &ConsoleSink).await?;
    info!("Query '{}' finished in phase {:?}", report.query, report.phase);

    if report.phase == QueryPhase::Failed {
        std::process::exit(1);
    }
    Ok(())
}
