mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    ideate::IdeateArgs, insight::InsightArgs, plan::PlanArgs, replan::ReplanArgs,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "deepplan",
    about = "Local planning engine: keep one plan, log decisions and risks, and QA the plan",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: nearest ancestor with .deepplan/, else cwd)
    #[arg(long, global = true, env = "DEEPPLAN_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .deepplan/ with an empty plan, logs, and config
    Init,

    /// Set plan fields, then run QA
    Plan(PlanArgs),

    /// Record execution evidence and extend insights, then run QA
    Replan(ReplanArgs),

    /// Append a decision to the decision log
    Decide {
        /// What was decided
        text: String,
        /// Why this option won
        #[arg(long)]
        reason: Option<String>,
        /// Comma-separated options that were considered and rejected
        #[arg(long)]
        rejected: Option<String>,
    },

    /// Append a risk to the risk log
    Risk {
        /// The risk
        text: String,
        /// Early signal that the risk is materializing
        #[arg(long)]
        signal: Option<String>,
        /// Planned mitigation
        #[arg(long)]
        mitigation: Option<String>,
    },

    /// Run the QA checklist against the current plan
    Qa,

    /// Show a summary of the current plan
    Show,

    /// List entries from an append-only log (decisions, risks, events)
    Log {
        /// Which log to read
        kind: String,
    },

    /// Propose candidate plans; optionally apply one
    Ideate(IdeateArgs),

    /// Propose an insight pack for a topic; optionally apply it
    Insight(InsightArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Plan(args) => cmd::plan::run(&root, args, cli.json),
        Commands::Replan(args) => cmd::replan::run(&root, args, cli.json),
        Commands::Decide {
            text,
            reason,
            rejected,
        } => cmd::decide::run(&root, &text, reason, rejected.as_deref(), cli.json),
        Commands::Risk {
            text,
            signal,
            mitigation,
        } => cmd::risk::run(&root, &text, signal, mitigation, cli.json),
        Commands::Qa => cmd::qa::run(&root, cli.json),
        Commands::Show => cmd::show::run(&root, cli.json),
        Commands::Log { kind } => cmd::log::run(&root, &kind, cli.json),
        Commands::Ideate(args) => cmd::ideate::run(&root, args, cli.json),
        Commands::Insight(args) => cmd::insight::run(&root, args, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
