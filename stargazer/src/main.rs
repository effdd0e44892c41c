use anyhow::Result;
use clap::Parser;
use stargazer::{commands, logging, Cli};
use std::io::{self, BufWriter, Write};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    commands::run(&cli, &mut out)?;
    out.flush()?;

    Ok(())
}
