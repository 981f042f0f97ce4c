use super::providers::{build_embedder, build_generator, build_pipeline};
use anyhow::Result;
use console::style;
use docqa_config::Config;
use docqa_core::readiness::{InitPolicy, ReadinessController};

pub async fn handle_ask(config: &Config, question: String, top: Option<usize>) -> Result<()> {
    let top_k = top.unwrap_or(config.retrieval.top_k);

    let controller = ReadinessController::new(
        build_pipeline(config),
        build_embedder(config)?,
        build_generator(config)?,
        top_k,
        InitPolicy::Lazy,
    );

    let result = controller.answer(&question).await?;

    println!("{}", style("Answer").bold());
    println!("{}\n", result.answer.trim());

    println!("{}", style("Sources").bold());
    for (i, source) in result.sources.iter().enumerate() {
        let origin = source
            .metadata
            .get("source")
            .map(String::as_str)
            .unwrap_or("unknown");
        println!(
            "  {}. [{:.3}] {} {}",
            i + 1,
            source.score,
            style(origin).dim(),
            source.excerpt
        );
    }

    Ok(())
}
