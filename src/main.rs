mod bundle;
mod cli;
mod config;
mod dates;
mod generator;
mod jsonresume;
mod latex;
mod render;
mod resume;
mod server;
mod template;
mod theme;
mod typeset;
mod web;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	cli.run().await
}
