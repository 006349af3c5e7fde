use anyhow::Context;
use clap::Parser;
use hostcollide::cli::{Cli, Commands};
use hostcollide::config::AppSettings;
use hostcollide::{logging, output};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Scan(cmd) => {
            let settings =
                AppSettings::load(cli.config.as_deref()).context("failed to load settings")?;
            cmd.execute(&settings, cli.quiet).await?;
        }
        Commands::Profiles(cmd) => cmd.execute(cli.quiet)?,
    }

    Ok(())
}
