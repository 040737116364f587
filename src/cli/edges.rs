use clap::Parser;
use rulebook::Config;
use tracing::instrument;

use super::Input;

#[derive(Debug, Parser)]
#[command(about = "Print every resolved citation, one per line")]
pub struct Edges {
    #[command(flatten)]
    input: Input,

    /// Print as a JSON array of `[source, target]` pairs
    #[arg(long)]
    json: bool,
}

impl Edges {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let corpus = self.input.load(config)?;
        let edges = corpus.graph().edges();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&edges)?);
        } else {
            for (source, target) in edges {
                println!("{source} -> {target}");
            }
        }

        Ok(())
    }
}
