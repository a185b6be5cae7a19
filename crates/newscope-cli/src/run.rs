//! Command implementations: adapter registration, search, export, analysis.

use anyhow::Context;

use newscope_analysis::AnalysisOrchestrator;
use newscope_core::{export_search_results, AppConfig, Article, SearchQuery};
use newscope_scraper::{SamsungSemiconNewsroom, SkHynixNewsroom};
use newscope_search::{GoogleCseClient, NaverNewsClient, SearchAggregator};

/// Builds the aggregator with every source the configuration supports.
///
/// API adapters are registered only when their credential pair is present;
/// the newsroom scrapers only need the WebDriver endpoint.
fn build_aggregator(config: &AppConfig) -> anyhow::Result<SearchAggregator> {
    let mut aggregator = SearchAggregator::new();

    if let (Some(id), Some(secret)) = (&config.naver_client_id, &config.naver_client_secret) {
        let client =
            NaverNewsClient::new(id, secret, config.http_timeout_secs, &config.user_agent)
                .context("failed to build Naver client")?;
        aggregator.register(Box::new(client));
    }

    if let (Some(key), Some(cx)) = (&config.google_api_key, &config.google_cse_cx) {
        let client = GoogleCseClient::new(key, cx, config.http_timeout_secs, &config.user_agent)
            .context("failed to build Google CSE client")?;
        aggregator.register(Box::new(client));
    }

    aggregator.register(Box::new(SkHynixNewsroom::new(
        &config.webdriver_url,
        config.element_wait_secs,
    )));
    aggregator.register(Box::new(SamsungSemiconNewsroom::new(
        &config.webdriver_url,
        config.element_wait_secs,
    )));

    Ok(aggregator)
}

/// Prints the sources usable with the current configuration.
pub fn list_sources(config: &AppConfig) -> anyhow::Result<()> {
    let aggregator = build_aggregator(config)?;
    for name in aggregator.source_names() {
        println!("{name}");
    }
    Ok(())
}

/// Runs one search batch: fan out, report, optionally export and analyze.
pub async fn search(
    config: &AppConfig,
    keyword: &str,
    limit: usize,
    sources: Vec<String>,
    window: Option<&str>,
    export: bool,
    analyze: bool,
) -> anyhow::Result<()> {
    let aggregator = build_aggregator(config)?;

    let sources = if sources.is_empty() {
        aggregator
            .source_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    } else {
        sources
    };

    let recency = window
        .map(str::parse)
        .transpose()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let query = SearchQuery {
        keyword: keyword.to_string(),
        max_results: limit,
        recency,
        sources,
    };

    let articles = aggregator.search_all(&query).await?;
    println!("collected {} articles for '{keyword}'", articles.len());
    for article in &articles {
        let date = article
            .published_at
            .map_or_else(|| "----------".to_string(), |d| d.format("%Y-%m-%d").to_string());
        println!("  [{date}] {:>22}  {}", article.source, article.title);
    }

    if export {
        export_by_source(config, keyword, &articles)?;
    }

    if analyze {
        let orchestrator = AnalysisOrchestrator::default();
        let result = orchestrator.analyze(&articles)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

/// One export file per (source, keyword, run).
fn export_by_source(
    config: &AppConfig,
    keyword: &str,
    articles: &[Article],
) -> anyhow::Result<()> {
    let mut sources: Vec<&str> = articles.iter().map(|a| a.source.as_str()).collect();
    sources.sort_unstable();
    sources.dedup();

    for source in sources {
        let subset: Vec<Article> = articles
            .iter()
            .filter(|a| a.source == source)
            .cloned()
            .collect();
        let path = export_search_results(&config.export_dir, keyword, source, &subset)
            .with_context(|| format!("failed to export results for source '{source}'"))?;
        println!("exported {} articles to {}", subset.len(), path.display());
    }
    Ok(())
}
