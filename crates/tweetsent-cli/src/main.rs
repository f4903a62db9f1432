mod accounts;
mod collect;
mod export;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::collect::CollectArgs;

#[derive(Debug, Parser)]
#[command(name = "tweetsent")]
#[command(about = "Collect account timelines and score their sentiment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, score, and export recent posts for configured accounts
    Collect(CollectArgs),
    /// List configured account groups and their handles
    Accounts {
        /// Account groups file
        #[arg(
            long,
            value_name = "PATH",
            env = "TWEETSENT_ACCOUNTS_PATH",
            default_value = "./config/accounts.yaml"
        )]
        accounts: PathBuf,
    },
}

/// Installs the global subscriber. `RUST_LOG` wins over `fallback`.
fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Collect(args) if args.dry_run => {
            let settings = tweetsent_core::load_collect_settings()?;
            init_tracing(&settings.log_level)?;
            collect::run_dry_run(&settings, &args)?;
        }
        Commands::Collect(args) => {
            let config = tweetsent_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            collect::run_collect(&config, &args).await?;
        }
        Commands::Accounts { accounts } => {
            init_tracing("info")?;
            accounts::run_list_accounts(&accounts)?;
        }
    }

    Ok(())
}
