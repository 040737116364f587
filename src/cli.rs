use std::path::PathBuf;

mod analyze;
mod articles;
mod categories;
mod edges;
mod terminal;

use analyze::Analyze;
use anyhow::Context;
use articles::Articles;
use categories::Categories;
use clap::ArgAction;
use edges::Edges;
use rulebook::{CitationExtractor, Config, Corpus, PlainTextSource};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("cannot load configuration from {}", path.display()))?,
            None => Config::default(),
        };

        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Report citation analytics for a set of documents
    Analyze(Analyze),

    /// Show the articles found in a set of documents
    Articles(Articles),

    /// List every resolved citation as a `source -> target` pair
    Edges(Edges),

    /// Group articles by the heading in their title
    Categories(Categories),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Analyze(command) => command.run(config),
            Self::Articles(command) => command.run(config),
            Self::Edges(command) => command.run(config),
            Self::Categories(command) => command.run(config),
        }
    }
}

/// The documents to read. Directories are searched recursively.
#[derive(Debug, clap::Args)]
pub struct Input {
    /// Documents or directories of documents
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,
}

impl Input {
    fn load(&self, config: &Config) -> anyhow::Result<Corpus> {
        let corpus = Corpus::load(
            &self.paths,
            &PlainTextSource::from_config(config),
            &CitationExtractor::default(),
            config,
        )
        .context("cannot build the corpus")?;

        let diagnostics = corpus.diagnostics();
        for failure in &diagnostics.failures {
            tracing::warn!("{}: {}", failure.path.display(), failure.reason);
        }

        Ok(corpus)
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
