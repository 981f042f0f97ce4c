use super::providers::{build_embedder, build_pipeline};
use anyhow::Result;
use console::style;
use docqa_config::Config;
use indicatif::ProgressBar;
use std::time::Duration;

/// Build (or reuse) the persisted index, then run a smoke-test search so a
/// broken index is caught at ingest time rather than at the first question.
pub async fn handle_ingest(config: &Config, force: bool) -> Result<()> {
    if force && config.index_dir().exists() {
        std::fs::remove_dir_all(config.index_dir())?;
        println!("{} discarded existing index", style("•").yellow());
    }

    let embedder = build_embedder(config)?;
    let pipeline = build_pipeline(config);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("chunking and embedding corpus...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let index = pipeline.ingest(embedder.as_ref()).await?;
    spinner.finish_and_clear();

    println!(
        "{} index ready: {} passages, dimension {}, at {}",
        style("✓").green(),
        index.len(),
        index.dimension(),
        config.index_dir().display()
    );

    let probe = "What does this corpus cover?";
    let query = embedder
        .embed(&[probe.to_string()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("embedding provider returned no vector"))?;
    let hits = index.search(&query, 2.min(index.len()))?;

    println!("\nsmoke test: {}", style(probe).dim());
    for (score, passage) in hits {
        let preview: String = passage.text.chars().take(120).collect();
        println!("  {:.3}  {}", score, preview);
    }

    Ok(())
}
