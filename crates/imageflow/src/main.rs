mod cli;
mod config;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::Config;
use imageflow_publish::{
    DryRunRunner, ProcessRunner, PublicationPlanner, PublishError, tag_warnings,
};

fn main() {
    let cli = Cli::parse();

    // ログは stdout に出力し、タイムスタンプは付けない
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli) {
        let message = match e.downcast_ref::<PublishError>() {
            Some(err) => err.user_message(),
            None => format!("{:#}", e),
        };
        tracing::debug!("{:?}", e);
        eprintln!("{} {}", "Error:".red().bold(), message);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(
        "Starting imageflow version {}...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_cli(cli);
    let request = config.request()?;

    for warning in tag_warnings(&request.default_tag) {
        tracing::warn!(
            "Default tag '{}' may be rejected by the registry: {}",
            request.default_tag,
            warning
        );
    }

    let planner =
        PublicationPlanner::new(&request, &config.credentials, config.engine.as_str());

    let summary = if config.dry_run {
        println!("{}", "Dry run: planned commands".yellow());
        planner.execute(&mut DryRunRunner::new())?
    } else {
        planner.execute(&mut ProcessRunner::new(&config.work_dir))?
    };

    println!(
        "{} {} completed ({} operations)",
        "✓".green(),
        request.action.to_string().cyan(),
        summary.operations
    );
    for image in &summary.pushed {
        println!("  → {}", image.to_string().cyan());
    }

    Ok(())
}
