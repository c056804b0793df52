use clap::Parser;
use meta_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap()?;

    match cli.command {
        Command::Tables => cli::tables::run(&config).await,
        Command::Get(args) => cli::get::run(&config, args).await,
    }
}
