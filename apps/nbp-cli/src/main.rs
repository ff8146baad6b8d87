//! # nbp-cli
//!
//! `nbpublish "<message>"` strips outputs from notebooks in the project,
//! commits everything that changed and pushes the current branch.
//!
//! Exit status is 0 when the run published something or found nothing to
//! publish, 1 otherwise. The run report goes to stdout, logs to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use nbp_pipeline::{PipelineError, PipelineOrchestrator, PublishConfig, RunReport, RunStatus};
use nbp_sanitize::CommandSanitizer;
use nbp_vcs::GitVcs;
use tracing_subscriber::EnvFilter;

/// Sanitize notebooks, commit all changes and push, in one step.
#[derive(Parser)]
#[command(name = "nbpublish", version, about)]
struct Cli {
    /// Commit message for the publish commit.
    message: Option<String>,

    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Config file (defaults to <project-root>/.nbp/publish.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Remote to set as upstream when the branch has none.
    #[arg(long)]
    remote: Option<String>,

    /// Skip the sanitize step.
    #[arg(long)]
    no_sanitize: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so they don't mix with the report on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("nbp_pipeline=info".parse()?)
                .add_directive("nbp_sanitize=info".parse()?)
                .add_directive("nbp_vcs=info".parse()?)
                .add_directive("nbpublish=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let message = match cli.message.as_deref() {
        Some(m) if !m.trim().is_empty() => m,
        _ => {
            eprintln!("error: a non-empty commit message is required\n");
            eprintln!("{}", Cli::command().render_usage());
            return Ok(ExitCode::FAILURE);
        }
    };

    run(&cli, message)
}

fn run(cli: &Cli, message: &str) -> anyhow::Result<ExitCode> {
    let project_root = cli
        .project_root
        .canonicalize()
        .unwrap_or_else(|_| cli.project_root.clone());

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PublishConfig::path_for(&project_root));
    let mut config = match PublishConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(error) => return fail_before_run(error, cli.json),
    };
    tracing::info!("project root: {}", project_root.display());
    if let Some(remote) = &cli.remote {
        config.git.remote = remote.clone();
    }
    if cli.no_sanitize {
        config.sanitize.enabled = false;
    }

    let vcs = GitVcs::new(&project_root);
    let sanitizer = CommandSanitizer::new(&project_root, &config.sanitize);
    let orchestrator = PipelineOrchestrator::new(&vcs, &sanitizer, &config, &project_root);

    match orchestrator.run(message) {
        Ok(report) => {
            print_report(&report, cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            print_report(&failure.report, cli.json)?;
            print_error(&failure.error);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Report a fatal error that happened before the pipeline could start.
fn fail_before_run(error: PipelineError, json: bool) -> anyhow::Result<ExitCode> {
    tracing::error!("setup failed: {}", error);
    let mut report = RunReport::start();
    report.error = Some(error.to_string());
    report.finish(RunStatus::Failed);
    print_report(&report, json)?;
    print_error(&error);
    Ok(ExitCode::FAILURE)
}

fn print_error(error: &PipelineError) {
    eprintln!("error: {}", error);
    eprintln!("  hint: {}", error.remedy());
}

fn print_report(report: &RunReport, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("serializing run report")?;
        println!("{}", out);
    } else {
        print!("{}", report);
    }
    Ok(())
}
