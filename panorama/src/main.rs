// panorama/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use miette::{Diagnostic, GraphicalReportHandler};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use panorama_core::PanoramaError;
use panorama_core::domain::error::DomainError;
use panorama_core::infrastructure::error::InfrastructureError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG=debug panorama ... or --verbose; logs go to stderr, results to stdout.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        report(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let project_dir = cli.project_dir;
    debug!(project_dir = ?project_dir, "Starting panorama");

    match cli.command {
        Commands::Metrics { languages, catalog } => {
            commands::metrics::execute(&project_dir, languages, catalog)
        }
        Commands::Check {
            draft,
            baseline,
            project,
            catalog,
        } => commands::check::execute(&project_dir, &draft, baseline, project, catalog),
        Commands::Reconcile {
            gate,
            from,
            to,
            catalog,
        } => commands::reconcile::execute(&project_dir, &gate, from, to, catalog),
        Commands::Branches { gate, repo } => commands::branches::execute(&gate, &repo),
        Commands::Status {
            gate,
            repo,
            branch,
            catalog,
        } => commands::status::execute(&project_dir, &gate, &repo, branch, catalog).await,
        Commands::Submit {
            draft,
            baseline,
            project,
            organization,
            catalog,
        } => {
            commands::submit::execute(&project_dir, &draft, baseline, project, organization, catalog)
                .await
        }
    }
}

/// Core errors carry miette diagnostics (code + help); everything else is printed plainly.
fn report(err: &anyhow::Error) {
    let diagnostic: Option<&dyn Diagnostic> = match err.downcast_ref::<PanoramaError>() {
        Some(PanoramaError::Domain(e)) => Some(e),
        Some(PanoramaError::Infrastructure(e)) => Some(e),
        Some(PanoramaError::InternalError(_)) => None,
        None => err
            .downcast_ref::<InfrastructureError>()
            .map(|e| e as &dyn Diagnostic)
            .or_else(|| err.downcast_ref::<DomainError>().map(|e| e as &dyn Diagnostic)),
    };

    if let Some(diagnostic) = diagnostic {
        let mut out = String::new();
        if GraphicalReportHandler::new()
            .render_report(&mut out, diagnostic)
            .is_ok()
        {
            eprint!("{}", out);
            return;
        }
    }
    eprintln!("❌ {:#}", err);
}
