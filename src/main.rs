use clap::Parser;
use hwmonitor::cli::{check, run, CheckCommand, Cli, Commands};
use hwmonitor::error::describe;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Check(CheckCommand::Config(arg)) => check::execute_config(&arg.config),
        Commands::Check(CheckCommand::Connection(arg)) => {
            check::execute_connection(&arg.config).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", describe(&e));
        std::process::exit(1);
    }
}
