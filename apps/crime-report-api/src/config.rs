//! Server configuration
//!
//! Values come from command-line flags, falling back to environment
//! variables (optionally loaded from a `.env` file) and then defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use report_store::IdPolicy;

/// Default name of the report file inside the base directory
pub const DEFAULT_REPORTS_FILE: &str = "crime_reports.json";

/// Command-line arguments for the crime report server
#[derive(Parser, Debug, Clone)]
#[command(name = "crime-report-api")]
#[command(about = "Serves crime charts and collects citizen incident reports")]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Directory holding index.html, report.html and frontend assets
    #[arg(long, env = "BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Report file (default: <base-dir>/crime_reports.json)
    #[arg(long, env = "REPORTS_FILE")]
    pub reports_file: Option<PathBuf>,

    /// Chart folder; skips probing the default candidates when set
    #[arg(long, env = "CHARTS_DIR")]
    pub charts_dir: Option<PathBuf>,

    /// Shared secret for the admin report routes
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// How new report ids are assigned: "count" or "sequential"
    #[arg(long, env = "REPORT_ID_POLICY", default_value = "count")]
    pub id_policy: IdPolicy,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolved configuration passed to the server at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub base_dir: PathBuf,
    pub reports_file: PathBuf,
    pub charts_dir: Option<PathBuf>,
    pub admin_secret: Option<String>,
    pub id_policy: IdPolicy,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", args.host, args.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", args.host, args.port))?;

        // Absolute so logs and /api/health show where files really live
        let base_dir = args
            .base_dir
            .canonicalize()
            .or_else(|_| std::env::current_dir().map(|cwd| cwd.join(&args.base_dir)))
            .with_context(|| format!("Invalid base directory {}", args.base_dir.display()))?;

        let reports_file = args
            .reports_file
            .unwrap_or_else(|| base_dir.join(DEFAULT_REPORTS_FILE));

        // An empty secret would let an empty password through
        let admin_secret = args.admin_password.filter(|s| !s.is_empty());

        Ok(Self {
            addr,
            base_dir,
            reports_file,
            charts_dir: args.charts_dir,
            admin_secret,
            id_policy: args.id_policy,
        })
    }
}
