//! UPR - Main entry point

use clap::Parser;
use colored::Colorize;
use std::process;
use tracing::error;
use upr_cli::api::UniProtClient;
use upr_cli::{Cli, RequestDescriptor, Retriever};
use upr_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Operational trail goes to the append-only log file; --verbose adds
    // debug output on the console.
    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Both)
            .build()
    } else {
        LogConfig::builder()
            .level(LogLevel::Info)
            .output(LogOutput::File)
            .build()
    };

    // Environment variables take precedence
    let log_config = LogConfig::from_env_with(log_config.clone()).unwrap_or(log_config);

    // Initialize logging (ignore errors as the CLI should work without it)
    let _ = init_logging(&log_config);

    // Execute the retrieval
    if let Err(e) = run(&cli).await {
        error!(error = %e, "Retrieval failed");
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

/// Build the request, run it, and print the terminal summary.
async fn run(cli: &Cli) -> upr_cli::Result<()> {
    let descriptor = RequestDescriptor::from_cli(cli)?;
    let client = UniProtClient::new(cli.base_url.clone(), &cli.email)?;
    let retriever = Retriever::new(client);

    let summary = retriever.run(&descriptor, &cli.output).await?;

    println!(
        "{} Retrieved {} record(s)",
        "✓".green(),
        summary.retrieved
    );
    println!("  Output: {}", cli.output.display());

    if summary.failed > 0 {
        println!(
            "{} {} entr{} failed and {} skipped; see the log for details",
            "!".yellow(),
            summary.failed,
            if summary.failed == 1 { "y" } else { "ies" },
            if summary.failed == 1 { "was" } else { "were" }
        );
    }

    if summary.truncated > 0 {
        println!(
            "{} Result limit reached; {} excess record(s) discarded",
            "!".yellow(),
            summary.truncated
        );
    }

    if summary.partial {
        println!(
            "{} Pagination stopped early; results are partial",
            "!".yellow()
        );
    }

    Ok(())
}
