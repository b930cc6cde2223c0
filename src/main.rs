//! pushcode - CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pushcode::config::{GeminiConfig, editor_command};
use pushcode::error::ConfigError;
use pushcode::git::{GitCli, discover_repo};
use pushcode::llm::GeminiClient;
use pushcode::{ExternalEditor, TerminalOperator, Workflow, WorkflowOutcome};

/// Log filter override, e.g. `PUSHCODE_LOG=pushcode=trace`.
const LOG_ENV_VAR: &str = "PUSHCODE_LOG";

/// Stage, commit and push with a Gemini-generated commit message.
#[derive(Parser, Debug)]
#[command(name = "pushcode")]
#[command(about = "Stage, commit and push with a Gemini-generated commit message")]
#[command(version)]
struct Cli {
    /// Show the git commands that would run without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Gemini model to use (overrides PUSHCODE_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is normal.
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    if cli.dry_run {
        println!("--- pushcode DRY RUN MODE ---");
        println!("No git commands will be executed.");
    }

    // Step 1: Configuration
    let config = GeminiConfig::from_env(cli.model.as_deref())
        .context("Gemini configuration is incomplete")?;

    // Step 2: Prerequisites
    which::which("git").map_err(|_| ConfigError::GitNotInstalled)?;

    let cwd = std::env::current_dir().context("Could not read the current directory")?;
    let repo = discover_repo(&cwd).context("Run pushcode from within a git working tree")?;
    debug!(
        "Repository {} on branch {}",
        repo.workdir.display(),
        repo.branch.as_deref().unwrap_or("(detached)")
    );

    // Step 3: Wire up collaborators
    let git = GitCli::new(repo.workdir, cli.dry_run);
    let generator = GeminiClient::new(config).context("Failed to set up the Gemini client")?;
    debug!("Using model {}", generator.model());
    let editor = ExternalEditor::new(editor_command());
    let mut operator = TerminalOperator;

    // Step 4: Run
    let outcome = Workflow::new(&git, &generator, &editor)
        .run(&mut operator)
        .await
        .context("Interactive prompt failed")?;

    debug!("Workflow finished: {:?}", outcome);
    if let WorkflowOutcome::Abandoned(stage) = outcome {
        println!("Stopped at the {stage} step.");
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
