//! Command-line interface for the control-system OPC UA adapter.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use csa_adapter::{shutdown_signal, Adapter, StartupReport};
use csa_core::config::{json_logging_requested, resolve_config_path};
use csa_core::{FileVariableSource, MemoryAddressSpace};
use csa_mapping::MappingConfig;
use tracing::info;

/// Control System OPC UA adapter - maps process variables into an address space.
#[derive(Parser, Debug)]
#[command(name = "csa-opcua")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a mapping document.
    Check {
        /// Mapping document (defaults to $CSA_CONFIG, then uamapping.toml).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Build the address space and print it.
    Build {
        /// Mapping document (defaults to $CSA_CONFIG, then uamapping.toml).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Process variable list.
        #[arg(long, required = true)]
        variables: PathBuf,
        /// Print the nodes and the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Build the address space and hold it until Ctrl-C or SIGTERM.
    Serve {
        /// Mapping document (defaults to $CSA_CONFIG, then uamapping.toml).
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Process variable list.
        #[arg(long, required = true)]
        variables: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Check { config } => run_check(config),
        Command::Build {
            config,
            variables,
            json,
        } => run_build(config, variables, json),
        Command::Serve { config, variables } => run_serve(config, variables).await,
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("csa={default_level}"))
            .add_directive(tracing::Level::WARN.into())
    });

    if json_logging_requested() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Load the mapping document. Any failure here is fatal.
fn load_config(path: Option<PathBuf>) -> Result<MappingConfig> {
    let path = resolve_config_path(path);
    MappingConfig::load(&path)
        .with_context(|| format!("Failed to load mapping document {}", path.display()))
}

fn build_adapter(
    config: Option<PathBuf>,
    variables: PathBuf,
) -> Result<(Adapter<MemoryAddressSpace>, StartupReport)> {
    let config = load_config(config)?;
    let adapter = Adapter::new(config, MemoryAddressSpace::new())?;
    let report = adapter
        .register_all(&FileVariableSource::new(&variables))
        .with_context(|| format!("Failed to read process variables from {}", variables.display()))?;
    Ok((adapter, report))
}

fn run_check(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    println!("Mapping document OK");
    println!("  root folder:   {}", config.root.root_folder);
    println!("  port:          {}", config.server.port);
    println!("  applications:  {}", config.application_names().len());
    println!("  rules:         {}", config.rules.len());
    println!("  extra folders: {}", config.additional_nodes.len());
    Ok(())
}

fn run_build(config: Option<PathBuf>, variables: PathBuf, json: bool) -> Result<()> {
    let (adapter, report) = build_adapter(config, variables)?;

    if json {
        let output = adapter.with_engine(|engine| {
            serde_json::json!({
                "nodes": engine.space().nodes(),
                "report": &report,
            })
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let tree = adapter.with_engine(|engine| engine.space().render_tree(engine.root().root));
    print!("{tree}");
    println!();
    println!(
        "{} variables ({} mapped, {} unmapped, {} constants), {} folders",
        report.variables, report.mapped, report.unmapped, report.constants, report.folders
    );
    if report.unbound_rule_sources.is_empty() {
        println!("All mapped variables were found.");
    } else {
        println!("Mapped variables without a process variable:");
        for source in &report.unbound_rule_sources {
            println!("  {source}");
        }
    }
    Ok(())
}

async fn run_serve(config: Option<PathBuf>, variables: PathBuf) -> Result<()> {
    let (adapter, report) = build_adapter(config, variables)?;
    info!(
        port = adapter.server().port,
        bindings = report.bindings.len(),
        "Address space ready"
    );

    adapter.run_until(shutdown_signal()).await;
    info!("Terminated");
    Ok(())
}
