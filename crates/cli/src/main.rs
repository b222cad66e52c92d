mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ormstrap")]
#[command(about = "Check ORM bootstrap options and the session they produce")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ORM resource against an options file and report the result
    Check {
        /// Options file (.yml, .yaml or .json)
        file: PathBuf,

        /// Section of the file holding the resource options
        #[arg(long, default_value = "doctrine2")]
        section: String,

        /// Application path used for default proxy locations
        #[arg(long, default_value = ".")]
        app_path: PathBuf,

        /// Also open the database connection
        #[arg(long)]
        connect: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file, section, app_path, connect, json } => {
            commands::check::run(commands::check::CheckArgs {
                file,
                section,
                app_path,
                connect,
                json,
            })
            .await
        }
    }
}
