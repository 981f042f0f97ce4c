use anyhow::Result;
use console::style;
use docqa_config::Config;
use docqa_core::index::VectorIndex;
use docqa_core::RagError;

/// Offline status report: inspects config and the persisted index without
/// calling any provider.
pub fn handle_status(config: &Config) -> Result<()> {
    let key_set = std::env::var("OPENAI_API_KEY")
        .map(|v| !v.is_empty())
        .unwrap_or(false);

    println!("corpus file:     {}", config.storage.corpus_file.display());
    println!(
        "corpus present:  {}",
        yes_no(config.storage.corpus_file.exists())
    );
    println!("index dir:       {}", config.index_dir().display());
    println!("api key set:     {}", yes_no(key_set));

    match VectorIndex::load(&config.index_dir()) {
        Ok((index, manifest)) => {
            println!(
                "index:           {} passages, dimension {}, model {}",
                index.len(),
                index.dimension(),
                manifest.embedding_model
            );
        }
        Err(RagError::IndexNotFound { .. }) => {
            println!("index:           {}", style("not built").yellow());
        }
        Err(RagError::IndexCorrupt { reason, .. }) => {
            println!("index:           {} ({reason})", style("corrupt").red());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn yes_no(v: bool) -> console::StyledObject<&'static str> {
    if v {
        style("yes").green()
    } else {
        style("no").red()
    }
}
