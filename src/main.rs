use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use wit_path_extractor::cli::{self, Args};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let program_dir = cli::program_dir()?;
    let stdout = std::io::stdout();
    cli::run(args, &program_dir, &mut stdout.lock())?;
    Ok(())
}
