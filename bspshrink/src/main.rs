mod cli;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use cli::Cli;
use libbsp::store::{read_map, write_map_atomic};
use libbsp::{LumpWhitelist, shrink};
use log::info;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli.map) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(path: &Path) -> anyhow::Result<()> {
    let whitelist = LumpWhitelist::DZSIMULATOR;
    info!("keeping lumps {whitelist}");

    let input = read_map(path)?;
    let output = shrink(&input, &whitelist)
        .with_context(|| format!("failed to shrink {}", path.display()))?;
    write_map_atomic(path, &output.data)?;

    println!(
        "DONE with shrinking map file {}: {}",
        path.display(),
        output.report
    );
    Ok(())
}
