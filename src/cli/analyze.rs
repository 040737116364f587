use clap::Parser;
use rulebook::{AnalyticsReport, ArticleId, Config, Diagnostics};
use serde_json::json;
use tracing::instrument;

use super::{
    terminal::{is_narrow, Colorize},
    Input, OutputFormat,
};

#[derive(Debug, Parser)]
#[command(about = "Report rankings, centrality, chains and cycles")]
pub struct Analyze {
    #[command(flatten)]
    input: Input,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Analyze {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let corpus = self.input.load(config)?;
        let report = corpus.analyze(config);

        match self.output {
            OutputFormat::Json => {
                let output = json!({
                    "report": report,
                    "diagnostics": corpus.diagnostics(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                output_table(&report);
                output_diagnostics(corpus.diagnostics());
            }
        }

        Ok(())
    }
}

fn output_table(report: &AnalyticsReport) {
    const MAX_CYCLE_DISPLAY: usize = 10;

    println!(
        "{} articles, {} citations",
        report.article_count, report.reference_count
    );
    println!();

    heading("Most cited");
    ranking(&report.most_referenced);

    heading("Most citing");
    ranking(&report.most_referencing);

    heading("Most central");
    match &report.central_articles {
        Some(central) if !central.is_empty() => {
            for (id, score) in central {
                println!("  {} {score:.4}", format!("{:<8}", id.as_str()).highlight());
            }
        }
        Some(_) => println!("  {}", "none".dim()),
        None => println!("  {}", "skipped".warning()),
    }
    println!();

    heading("Isolated");
    if report.isolated_articles.is_empty() {
        println!("  {} ✅", "0".success());
    } else {
        println!("  {}", join(&report.isolated_articles, ", "));
    }
    println!();

    heading("Longest chains");
    match &report.reference_chains {
        Some(chains) if !chains.is_empty() => {
            for chain in chains {
                println!("  ({}) {}", chain.len(), join(chain, " -> "));
            }
        }
        Some(_) => println!("  {}", "none".dim()),
        None => println!("  {}", "skipped".warning()),
    }
    println!();

    heading("Circular references");
    match &report.circular_references {
        Some(cycles) if cycles.is_empty() => println!("  {} ✅", "0".success()),
        Some(cycles) => {
            println!("  {} ⚠️", cycles.len().to_string().warning());
            for cycle in cycles.iter().take(MAX_CYCLE_DISPLAY) {
                println!("  - {}", join(cycle, " -> "));
            }
            if cycles.len() > MAX_CYCLE_DISPLAY {
                println!(
                    "  - ... and {} more cycles",
                    cycles.len() - MAX_CYCLE_DISPLAY
                );
            }
        }
        None => println!("  {}", "skipped".warning()),
    }

    for failure in &report.failures {
        println!("{}", failure.dim());
    }
}

fn output_diagnostics(diagnostics: &Diagnostics) {
    if diagnostics.is_clean() && diagnostics.unresolved_citations == 0 {
        return;
    }

    println!();
    heading("Diagnostics");
    let lines = [
        ("unreadable documents", diagnostics.failures.len()),
        ("malformed boundaries", diagnostics.malformed_boundaries.len()),
        ("duplicate articles", diagnostics.duplicate_articles.len()),
        ("unresolved citations", diagnostics.unresolved_citations),
    ];
    for (label, count) in lines.into_iter().filter(|&(_, count)| count > 0) {
        println!("  {label}: {}", count.to_string().warning());
    }
}

fn heading(title: &str) {
    println!("{title}");
    if !is_narrow() {
        println!("{}", "─".repeat(title.chars().count()).dim());
    }
}

fn ranking(entries: &[(ArticleId, usize)]) {
    if entries.is_empty() {
        println!("  {}", "none".dim());
    }
    for (id, degree) in entries {
        println!("  {} {degree}", format!("{:<8}", id.as_str()).highlight());
    }
    println!();
}

fn join(ids: &[ArticleId], separator: &str) -> String {
    ids.iter()
        .map(ArticleId::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}
