//! Command-line front end for the ice-cream factory models.

mod app;
mod cli;
mod config;
mod helpers;
mod logging;
mod render;

use std::io;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    app::run(cli, &mut out)
}
