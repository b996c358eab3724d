use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod cli_exec;

#[derive(Parser)]
#[command(name = "code-manager-dashboard")]
#[command(about = "Dashboard for Code Manager deploys", long_about = None)]
struct Cli {
    /// Output more information
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output debugging information
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output trace information (more than debug)
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load current state from the Code Manager API
    Getapi {
        #[command(flatten)]
        api: ApiArgs,
        /// File to store state in
        #[arg(short = 'f', long)]
        state_file: Option<PathBuf>,
        /// Show state
        #[arg(short = 'S', long)]
        show: bool,
    },

    /// Load current state from snapshot files, applied in order
    Getfile {
        /// File to store state in
        #[arg(short = 'f', long)]
        state_file: Option<PathBuf>,
        /// Show state
        #[arg(short = 'S', long)]
        show: bool,
        /// Raw deploy status JSON files
        snapshots: Vec<PathBuf>,
    },

    /// Show deployment status recorded in the state file
    Show {
        /// File state is stored in
        #[arg(short = 'f', long)]
        state_file: PathBuf,
        /// Environments to show (defaults to all)
        environments: Vec<String>,
    },

    /// Start HTTP server
    Serve {
        /// File state is stored in
        #[arg(short = 'f', long)]
        state_file: PathBuf,
        /// [ADDRESS]:PORT to listen on
        #[arg(short = 'l', long, default_value = "localhost:8080")]
        listen_on: String,
        /// Write bound address to this file
        #[arg(long)]
        addr_file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ApiArgs {
    /// Code Manager host
    #[arg(long, env = "CODE_MANAGER_HOST")]
    host: String,
    /// Code Manager port
    #[arg(long, default_value_t = code_manager_dashboard::model::DEFAULT_PORT)]
    port: u16,
    /// RBAC token
    #[arg(long, env = "PE_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// CA certificate (PEM) used to verify the server
    #[arg(long, env = "CODE_MANAGER_CA_CERT")]
    ca_cert: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    cli_exec::handle_command(cli.command)
}

fn init_tracing(cli: &Cli) {
    let level = if cli.trace {
        "trace"
    } else if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
