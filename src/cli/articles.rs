use clap::Parser;
use rulebook::{ArticleView, Config};
use tracing::instrument;

use super::{
    terminal::{is_narrow, truncate, Colorize},
    Input, OutputFormat,
};

#[derive(Debug, Parser)]
#[command(about = "Show each article with its citations in both directions")]
pub struct Articles {
    #[command(flatten)]
    input: Input,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Include the full article text in the table
    #[arg(long)]
    content: bool,
}

impl Articles {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let corpus = self.input.load(config)?;
        let graph = corpus.graph();

        match self.output {
            OutputFormat::Json => {
                // Keyed by identifier, in first-seen order.
                let mut articles = serde_json::Map::new();
                for view in graph.iter() {
                    articles.insert(view.id.to_string(), serde_json::to_value(&view)?);
                }
                println!("{}", serde_json::to_string_pretty(&articles)?);
            }
            OutputFormat::Table => {
                for view in graph.iter() {
                    self.output_article(&view);
                }
            }
        }

        Ok(())
    }

    fn output_article(&self, view: &ArticleView<'_>) {
        let title_width = if is_narrow() { 40 } else { 72 };

        println!(
            "{} {} {}",
            view.id.highlight(),
            truncate(view.title, title_width),
            format!("({} words)", view.word_count).dim()
        );
        println!(
            "  {} {}",
            "source:".dim(),
            view.source_document
        );
        println!("  {} {}", "cites:".dim(), list(view.outgoing_refs.iter()));
        println!(
            "  {} {}",
            "cited by:".dim(),
            list(view.incoming_refs.iter())
        );
        if !view.unresolved_refs.is_empty() {
            println!(
                "  {} {}",
                "unresolved:".dim(),
                list(view.unresolved_refs.iter()).warning()
            );
        }
        if self.content {
            for line in view.content.lines() {
                println!("  │ {line}");
            }
        }
        println!();
    }
}

fn list<'a>(ids: impl Iterator<Item = &'a rulebook::ArticleId>) -> String {
    let ids: Vec<&str> = ids.map(|id| id.as_str()).collect();
    if ids.is_empty() {
        "–".dim()
    } else {
        ids.join(", ")
    }
}
