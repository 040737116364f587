use clap::Parser;
use rulebook::{categorize, Config};
use tracing::instrument;

use super::{terminal::Colorize, Input, OutputFormat};

#[derive(Debug, Parser)]
#[command(about = "Group articles by the heading in their title")]
pub struct Categories {
    #[command(flatten)]
    input: Input,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

impl Categories {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let corpus = self.input.load(config)?;
        let categories = categorize(corpus.graph().articles());

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&categories)?),
            OutputFormat::Table => {
                for category in &categories {
                    println!(
                        "{} {}",
                        category.name,
                        format!("({})", category.articles.len()).dim()
                    );
                    let ids: Vec<&str> = category.articles.iter().map(|id| id.as_str()).collect();
                    println!("  {}", ids.join(", "));
                }
            }
        }

        Ok(())
    }
}
