use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use docs_enricher::config::Config;
use docs_enricher::document::ParsedDocument;
use docs_enricher::file::loader::{load_document, load_document_from_stdin};
use docs_enricher::file::saver::{save_properties, to_json_string};
use docs_enricher::stage::EnrichmentStage;

/// docs-enricher - enrich JSON/YAML documents with additional properties
#[derive(Parser)]
#[command(name = "docs-enricher")]
#[command(version)]
#[command(about = "Enriches JSON/YAML documents with static and looked-up properties", long_about = None)]
struct Cli {
    /// Document to enrich (omit to read JSON from stdin)
    document: Option<PathBuf>,

    /// Config file (default: ~/.config/docs-enricher/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the enriched properties here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Runs the document through every stage in order.
async fn run_stages(stages: &[EnrichmentStage], document: ParsedDocument) -> Result<ParsedDocument> {
    let mut document = document;
    for (index, stage) in stages.iter().enumerate() {
        let invocation = stage.process(Some(document));
        if !invocation.completed_synchronously() {
            tracing::debug!(stage = index, "waiting for enrichment stage");
        }

        match invocation.into_result().await {
            Ok(enriched) => document = enriched,
            Err(failure) => {
                tracing::error!(stage = index, error = %failure.cause, "enrichment failed");
                bail!("Enrichment failed at stage {}: {}", index + 1, failure.cause);
            }
        }
    }
    Ok(document)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(),
    };
    let stages = config
        .build_stages()
        .context("Invalid enrichment configuration")?;

    let document = match &cli.document {
        Some(path) => load_document(path)?,
        None => {
            if io::stdin().is_terminal() {
                bail!("No document given and nothing piped to stdin");
            }
            load_document_from_stdin()?
        }
    };
    tracing::info!(
        document = document.original_document().name(),
        stages = stages.len(),
        "enriching document"
    );

    let enriched = run_stages(&stages, document).await?;

    match &cli.output {
        Some(path) => {
            save_properties(path, enriched.properties(), &config.output)?;
            tracing::info!(output = %path.display(), "wrote enriched properties");
        }
        None => {
            let text = to_json_string(enriched.properties(), config.output.indent_size)?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text).context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
