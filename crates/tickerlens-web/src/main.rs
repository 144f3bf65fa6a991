use clap::Parser;

use tickerlens_web::cli::{Cli, Command};
use tickerlens_web::config::{ledger_config, ServerConfig};
use tickerlens_web::{commands, telemetry, ServerError};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

async fn run() -> Result<(), ServerError> {
    let cli = Cli::parse();
    telemetry::init_tracing()?;

    match &cli.command {
        Command::Serve(args) => {
            let config = ServerConfig::from_args(cli.db_path.as_deref(), args)?;
            commands::serve(config).await
        }
        Command::History(args) => {
            let records =
                commands::history(ledger_config(cli.db_path.as_deref()), &args.user).await?;
            let rendered = if args.pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            println!("{rendered}");
            Ok(())
        }
        Command::PurgeHistory => {
            let removed = commands::purge_history(ledger_config(cli.db_path.as_deref())).await?;
            println!("{removed}");
            Ok(())
        }
    }
}
