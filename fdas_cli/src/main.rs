//! # fdas - Fire Detection & Alarm System estimator
//!
//! Command-line front end for `fdas_core`. Reads an estimate document
//! (`--input`), derives loops, NACs, modules and the BOM, and writes the
//! CSV/JSON exports.
//!
//! ```text
//! fdas login --username admin --password fdas123
//! fdas init site.fdas.json
//! fdas --input site.fdas.json floor set 1 smoke 120
//! fdas --input site.fdas.json summary
//! fdas --input site.fdas.json export csv -o -
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context as _, Result};
use clap::{ArgAction, Parser, Subcommand};
use fdas_core::{save_project, Estimate, FdasError, Project};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod session;
mod workspace;

use commands::{Context, ExportArgs, FloorArgs, RulesArgs};
use session::Session;
use workspace::Workspace;

/// Fire Detection & Alarm System estimator
#[derive(Parser, Debug)]
#[command(name = "fdas")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Estimate document (JSON); built-in defaults are used when omitted
    #[arg(short, long, global = true, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Unlock the estimator (convenience gate, not a security boundary)
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Lock the estimator again
    Logout,

    /// Show login state and the active document
    Status,

    /// Write a default estimate document
    Init {
        path: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        prepared_by: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Quick summary: SLC points, loops, NACs, modules
    Summary,

    /// Bill of materials
    Bom {
        /// Only include devices whose label contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Export the BOM (CSV) or everything (JSON)
    Export(ExportArgs),

    /// Edit floors
    Floor(FloorArgs),

    /// View or edit estimation rules
    Rules(RulesArgs),
}

fn init_tracing(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryView<'a> {
    #[serde(flatten)]
    estimate: &'a Estimate,
    loop_fill_percent: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView {
    authenticated: bool,
    data_dir: String,
    input: Option<String>,
    floors: Option<usize>,
}

/// Context for a gated estimator command
fn estimator(cli: &Cli, session: &Session) -> Result<Context> {
    session.require()?;
    Ok(Context {
        workspace: Workspace::open(cli.input.as_deref())?,
        json: cli.json,
    })
}

fn run(cli: &Cli) -> Result<()> {
    let session = Session::locate()?;

    match &cli.command {
        Commands::Login { username, password } => {
            if !session.login(username, password)? {
                bail!("Invalid username or password");
            }
            println!("[OK] Logged in as {}", username.trim());
            Ok(())
        }
        Commands::Logout => {
            session.logout()?;
            println!("[OK] Logged out");
            Ok(())
        }
        Commands::Status => status(cli, &session),
        Commands::Init {
            path,
            title,
            prepared_by,
            force,
        } => {
            session.require()?;
            init_document(path, title, prepared_by, *force)
        }
        Commands::Summary => {
            let ctx = estimator(cli, &session)?;
            let project = ctx.workspace.project();
            let estimate = project.estimate();
            let view = SummaryView {
                estimate: &estimate,
                loop_fill_percent: estimate.loop_fill_percent(),
            };
            ctx.emit(&view, || render::summary(&estimate, &project.rules))
        }
        Commands::Bom { search } => {
            let ctx = estimator(cli, &session)?;
            let project = ctx.workspace.project();
            let rows = project.estimate().bom_rows(&project.rules, search);
            ctx.emit(&rows, || render::bom_table(&rows))
        }
        Commands::Export(args) => args.execute(&estimator(cli, &session)?),
        Commands::Floor(args) => args.execute(&mut estimator(cli, &session)?),
        Commands::Rules(args) => args.execute(&mut estimator(cli, &session)?),
    }
}

fn status(cli: &Cli, session: &Session) -> Result<()> {
    let floors = match cli.input.as_deref() {
        Some(p) if session.is_authenticated() => Some(
            Workspace::open(Some(p))?.project().floors.len(),
        ),
        _ => None,
    };
    let view = StatusView {
        authenticated: session.is_authenticated(),
        data_dir: session.dir().display().to_string(),
        input: cli.input.as_ref().map(|p| p.display().to_string()),
        floors,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("Logged in:  {}", if view.authenticated { "yes" } else { "no" });
    println!("Data dir:   {}", view.data_dir);
    match (&view.input, view.floors) {
        (Some(input), Some(n)) => println!("Document:   {} ({} floors)", input, n),
        (Some(input), None) => println!("Document:   {}", input),
        (None, _) => println!("Document:   (defaults)"),
    }
    Ok(())
}

fn init_document(path: &Path, title: &str, prepared_by: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    let project = Project::new(title, prepared_by);
    save_project(&project, path).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "initialized estimate document");
    println!("[OK] Wrote estimate document: {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if cli.json {
                if let Some(err) = e.downcast_ref::<FdasError>() {
                    if let Ok(json) = serde_json::to_string_pretty(err) {
                        eprintln!("{}", json);
                    }
                }
            }
            ExitCode::FAILURE
        }
    }
}
