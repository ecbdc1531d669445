// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument parsing and command dispatch.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lattice_app_core::config::ConfigService;
use lattice_app_core::prefs::{ExperimentPrefs, PREFS_KEY};
use lattice_config_fs::FsConfigStore;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::report::Report;
use crate::script::{run_script, Script};

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(name = "lattice-probe", author, version)]
#[command(about = "Replay lattice probe sessions and inspect displacement history")]
pub struct Cli {
    /// Directory holding saved prefs (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON script and print the resulting history
    Run {
        /// Path to the script file
        script: PathBuf,
        /// Print the report as JSON instead of tables
        #[arg(long)]
        json: bool,
        /// Abort on the first failing step
        #[arg(long)]
        strict: bool,
        /// Override the drag speed
        #[arg(long)]
        move_speed: Option<f32>,
        /// Override the default tick length in seconds
        #[arg(long)]
        dt: Option<f32>,
    },
    /// Inspect or initialize saved prefs
    Config {
        /// Config action.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Print the saved prefs (defaults if none are saved)
    Show,
    /// Write default prefs
    Init {
        /// Overwrite existing prefs
        #[arg(long)]
        force: bool,
    },
}

/// Runs `cli` and returns the text to print on stdout.
pub fn execute(cli: Cli) -> Result<String> {
    let store = open_store(cli.config_dir.as_deref())?;
    match cli.command {
        Commands::Run {
            script,
            json,
            strict,
            move_speed,
            dt,
        } => {
            let prefs = load_prefs_lenient(&store);
            let mut script = Script::load(&script)?;
            if let Some(speed) = move_speed {
                let mut config = script.config.unwrap_or(prefs.experiment);
                config.move_speed = speed;
                script.config = Some(config);
            }
            if let Some(dt) = dt {
                script.dt = dt;
            }
            let session = run_script(&script, &prefs, strict)?;
            let report = Report::from_session(session)?;
            if json {
                report.to_json()
            } else {
                Ok(report.to_tables())
            }
        }
        Commands::Config { action } => config_command(store, action),
    }
}

fn open_store(dir: Option<&Path>) -> Result<FsConfigStore> {
    match dir {
        Some(dir) => FsConfigStore::with_base(dir)
            .with_context(|| format!("failed to open config dir {}", dir.display())),
        None => FsConfigStore::new().context("failed to open platform config dir"),
    }
}

fn load_prefs_lenient(store: &FsConfigStore) -> ExperimentPrefs {
    let svc = ConfigService::new(store.clone());
    match svc.load_or_default(PREFS_KEY) {
        Ok(prefs) => prefs,
        Err(err) => {
            warn!(error = %err, "failed to load prefs; using defaults");
            ExperimentPrefs::default()
        }
    }
}

fn config_command(store: FsConfigStore, action: ConfigAction) -> Result<String> {
    let path = store.path_for(PREFS_KEY)?;
    let svc = ConfigService::new(store);
    match action {
        ConfigAction::Show => {
            let prefs: ExperimentPrefs = svc
                .load_or_default(PREFS_KEY)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(serde_json::to_string_pretty(&prefs)?)
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "prefs already exist at {}; pass --force to overwrite",
                    path.display()
                );
            }
            svc.save(PREFS_KEY, &ExperimentPrefs::default())
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(format!("wrote {}", path.display()))
        }
    }
}
