// file: src/main.rs
// description: commandline application entry point, startup checks and watch loop
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use md_autopost::utils::logging::{
    format_error, format_field, format_info, format_rule, format_success, format_warning,
    init_logger,
};
use md_autopost::{
    CmarkRenderer, Config, ConnectionStatus, PipelineError, PipelineStats, WatchLoop,
    WordPressClient,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "md_autopost")]
#[command(author = "cipher")]
#[command(version)]
#[command(about = "Publishes markdown files dropped into a folder to WordPress", long_about = None)]
struct Cli {
    /// Optional TOML file layered under the environment
    #[arg(short, long, value_name = "FILE", env = "AUTOPOST_CONFIG")]
    config: Option<PathBuf>,

    /// Dotenv file to read instead of ./.env
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    skip_connection_check: bool,

    /// Publish the files already waiting, then exit
    #[arg(long, action = ArgAction::SetTrue)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    let config = match Config::load(cli.config.as_deref(), cli.env_file.as_deref()) {
        Ok(config) => config,
        Err(PipelineError::InvalidConfig(problems)) => {
            eprintln!("{}", format_error("Configuration is invalid:"));
            for problem in &problems {
                eprintln!("  - {}", problem);
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };

    print_banner(&config);

    let client =
        Arc::new(WordPressClient::new(&config.api).context("Failed to create WordPress client")?);

    if !cli.skip_connection_check {
        check_connection(&client).await;
    }

    let watch_loop = WatchLoop::new(config.watch.clone(), client, CmarkRenderer::new());

    let stats = if cli.once {
        watch_loop
            .run_once()
            .await
            .context("Failed to publish existing files")?
    } else {
        watch_loop
            .run(shutdown_signal())
            .await
            .context("Watch loop failed")?
    };

    print_summary(&stats);
    Ok(())
}

fn print_banner(config: &Config) {
    println!("{}", format_rule());
    println!("{}", format_info("md_autopost"));
    println!("{}", format_field("Site", &config.api.base_url));
    println!("{}", format_field("Watching", config.watch.watch_dir.display()));
    println!("{}", format_field("Archive", config.watch.archive_dir.display()));
    println!("{}", format_field("Format", "---"));
    for line in [
        "title: <title>",
        "category: <name>",
        "date: YYYY-MM-DD HH:MM",
        "status: publish | draft | future",
        "---",
    ] {
        println!("{:13}{}", "", line);
    }
    println!("{}", format_rule());
}

async fn check_connection(client: &WordPressClient) {
    info!("Checking connection to {}", client.api_root());

    match client.check_connection().await {
        ConnectionStatus::Connected => {
            println!("{}", format_success("Connected to WordPress"));
        }
        ConnectionStatus::Unauthorized => {
            println!(
                "{}",
                format_error("WordPress rejected the credentials (401), check WP_USER and WP_APP_PASSWORD")
            );
        }
        ConnectionStatus::Unexpected(status) => {
            println!(
                "{}",
                format_warning(&format!("Unexpected status {} from WordPress", status))
            );
        }
        ConnectionStatus::Unreachable(e) => {
            println!(
                "{}",
                format_warning(&format!("Could not reach WordPress: {}", e))
            );
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, finishing in-flight posts"),
        Err(e) => {
            // keep watching rather than exit without a signal handler
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn print_summary(stats: &PipelineStats) {
    println!("{}", format_rule());
    println!(
        "{}",
        format_success(&format!(
            "Published {} posts ({:.1}% of submitted)",
            stats.files_published,
            stats.success_rate()
        ))
    );
    println!("{}", format_field("Attempts", stats.attempts()));
    println!("{}", format_field("Runtime", format!("{}s", stats.duration_secs)));
    if stats.files_failed > 0 {
        println!("{}", format_error(&format!("Failed: {}", stats.files_failed)));
    }
    if stats.files_skipped > 0 {
        println!("{}", format_info(&format!("Skipped empty files: {}", stats.files_skipped)));
    }
    if stats.readiness_timeouts > 0 {
        println!(
            "{}",
            format_warning(&format!("Not ready in time: {}", stats.readiness_timeouts))
        );
    }
    if stats.archive_failures > 0 {
        warn!(
            "{} published files could not be archived and remain in the watch folder",
            stats.archive_failures
        );
    }
    println!("{}", format_rule());
}
