// panorama/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "panorama")]
#[command(about = "Quality Gate condition engine: metrics, validation, status", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding panorama.yaml and the local gate store
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Debug-level logs on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📏 Lists the metrics a gate can use for the given languages
    Metrics {
        /// Repository language (repeatable)
        #[arg(long = "language", short)]
        languages: Vec<String>,

        /// Metric catalog YAML replacing the built-in one
        #[arg(long, env = "PANORAMA_CATALOG")]
        catalog: Option<PathBuf>,
    },

    /// ✅ Reports whether a draft gate can be saved or reset
    Check {
        /// Draft gate (JSON record)
        #[arg(long)]
        draft: PathBuf,

        /// Last saved version of the gate (JSON record)
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Owning project (JSON). Without it the gate is an organization gate.
        #[arg(long)]
        project: Option<PathBuf>,

        #[arg(long, env = "PANORAMA_CATALOG")]
        catalog: Option<PathBuf>,
    },

    /// 🔁 Re-keys gate conditions after the project's languages changed
    Reconcile {
        /// Gate (JSON record)
        #[arg(long)]
        gate: PathBuf,

        /// Languages before the change (repeatable)
        #[arg(long = "from", required = true)]
        from: Vec<String>,

        /// Languages after the change (repeatable)
        #[arg(long = "to", required = true)]
        to: Vec<String>,

        #[arg(long, env = "PANORAMA_CATALOG")]
        catalog: Option<PathBuf>,
    },

    /// 🌿 Lists the branches a gate can be inspected on
    Branches {
        #[arg(long)]
        gate: PathBuf,

        /// Repository (JSON)
        #[arg(long)]
        repo: PathBuf,
    },

    /// 🚦 Shows the evaluation status of a gate on one branch
    Status {
        #[arg(long)]
        gate: PathBuf,

        #[arg(long)]
        repo: PathBuf,

        #[arg(long)]
        branch: Option<String>,

        #[arg(long, env = "PANORAMA_CATALOG")]
        catalog: Option<PathBuf>,
    },

    /// 💾 Saves a draft gate into the local store
    Submit {
        #[arg(long)]
        draft: PathBuf,

        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Owning project (JSON); selects the personal or team surface
        #[arg(long)]
        project: Option<PathBuf>,

        /// Organization id, for organization gates and templates
        #[arg(long, conflicts_with = "project")]
        organization: Option<String>,

        #[arg(long, env = "PANORAMA_CATALOG")]
        catalog: Option<PathBuf>,
    },
}
