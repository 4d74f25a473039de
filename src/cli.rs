mod color;

use crate::config::{ACCESS_TOKEN_ENV, CONFIG_ENV, SERVER_URL_ENV, WORKON_ENV};
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
pub use color::ColorMode;
use std::path::PathBuf;

/// Command-line client for the REANA reproducible analysis platform
#[derive(Parser, Debug)]
#[command(name = "reana-client", author, version, about, long_about = None)]
pub struct Cli {
    /// Client config file [default: <config dir>/reana/client.toml]
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// REANA server URL
    #[arg(long, global = true, env = SERVER_URL_ENV)]
    pub server_url: Option<String>,

    /// When to colour output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// Access token of the current user
    #[arg(short = 't', long, env = ACCESS_TOKEN_ENV, hide_env_values = true)]
    pub access_token: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WorkflowArgs {
    /// Name or UUID of the workflow
    #[arg(short = 'w', long, env = WORKON_ENV)]
    pub workflow: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check connection to the REANA server
    Ping {
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// List all workflows and sessions
    List {
        #[command(flatten)]
        auth: AuthArgs,

        /// List only the runs of this workflow
        #[arg(short = 'w', long)]
        workflow: Option<String>,

        /// Filter workflows, e.g. --filter status=running --filter name=myanalysis
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Select output columns and filter rows, e.g. --format name,status=running
        #[arg(long, value_delimiter = ',')]
        format: Vec<String>,

        /// Print the table as JSON
        #[arg(long)]
        json: bool,

        /// Add a column with the run duration
        #[arg(long)]
        include_duration: bool,

        /// Results page number
        #[arg(long)]
        page: Option<u64>,

        /// Number of results per page
        #[arg(long)]
        size: Option<u64>,
    },
    /// Get workflow logs
    Logs {
        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        workflow: WorkflowArgs,

        /// Filter job logs, e.g. --filter step=gendata,compute_backend=kubernetes
        #[arg(long = "filter", value_delimiter = ',')]
        filters: Vec<String>,

        /// Print the logs as JSON
        #[arg(long)]
        json: bool,

        /// Results page number
        #[arg(long)]
        page: Option<u64>,

        /// Number of results per page
        #[arg(long)]
        size: Option<u64>,
    },
    /// Get workspace disk usage
    #[command(disable_help_flag = true)]
    Du {
        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        workflow: WorkflowArgs,

        /// Display total disk usage of the workspace
        #[arg(short, long)]
        summarize: bool,

        /// Show sizes in human-readable format
        #[arg(short = 'h', long)]
        human_readable: bool,

        /// Filter files, e.g. --filter name=data/,size=1024
        #[arg(long = "filter", value_delimiter = ',')]
        filters: Vec<String>,

        /// Print help
        #[arg(long, action = ArgAction::Help)]
        help: Option<bool>,
    },
    /// Add secrets from literal strings or files
    #[command(group(
        ArgGroup::new("secrets").required(true).multiple(true).args(["env", "files"])
    ))]
    SecretsAdd {
        #[command(flatten)]
        auth: AuthArgs,

        /// Secret as NAME=VALUE, may be repeated
        #[arg(long, value_delimiter = ',')]
        env: Vec<String>,

        /// File to upload as a secret, may be repeated
        #[arg(long = "file", value_delimiter = ',')]
        files: Vec<PathBuf>,

        /// Overwrite secrets that already exist
        #[arg(long)]
        overwrite: bool,
    },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
