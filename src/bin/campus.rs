use clap::Parser;
use tracing_subscriber::EnvFilter;

use campus_api::cli::utils::output_error;
use campus_api::cli::{Cli, OutputFormat};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = campus_api::cli::run(cli).await {
        match std::env::var("CAMPUS_CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => output_error(&output_format, &e.to_string()),
        }
        std::process::exit(1);
    }
}
