//! `rulebook`: segment rulebook documents into articles and analyze the
//! citations between them.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
