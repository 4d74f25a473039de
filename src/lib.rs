pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod filter;

use crate::api::{ApiClient, ClientOptions};
use crate::cli::{AuthArgs, WorkflowArgs};
use crate::commands::{du, list, logs, ping, secrets_add};
use crate::config::{ClientConfig, load_config};
pub use cli::{Cli, ColorMode, Commands, cli_parse};
use std::io::IsTerminal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over the verbosity flags when set.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("reana_client={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

struct Session<'a> {
    cli: &'a Cli,
    config: ClientConfig,
}

impl Session<'_> {
    fn client(&self, auth: &AuthArgs) -> anyhow::Result<ApiClient> {
        let server_url = self.config.server_url(self.cli.server_url.as_deref())?;
        let access_token = self.config.access_token(auth.access_token.as_deref())?;
        info!(%server_url, "using REANA server");

        let options = ClientOptions {
            insecure_tls: self.config.insecure_tls,
            timeout_secs: self.config.timeout_secs,
            show_progress: !self.cli.quiet && std::io::stderr().is_terminal(),
        };
        Ok(ApiClient::new(&server_url, &access_token, &options)?)
    }

    fn workflow(&self, args: &WorkflowArgs) -> anyhow::Result<String> {
        Ok(self.config.workflow(args.workflow.as_deref())?)
    }
}

pub fn run(cli: &Cli) -> anyhow::Result<()> {
    cli.color.apply();
    let config = load_config(cli.config.as_deref())?;
    debug!(server_url = ?config.server_url, insecure_tls = config.insecure_tls, "loaded client config");
    let session = Session { cli, config };

    match &cli.command {
        Commands::Ping { auth } => ping::run(&session.client(auth)?),
        Commands::List {
            auth,
            workflow,
            filters,
            format,
            json,
            include_duration,
            page,
            size,
        } => {
            let options = list::ListOptions {
                workflow: workflow.clone(),
                filters: filters.clone(),
                format: format.clone(),
                json: *json,
                include_duration: *include_duration,
                page: *page,
                size: *size,
            };
            list::run(&session.client(auth)?, &options)
        }
        Commands::Logs {
            auth,
            workflow,
            filters,
            json,
            page,
            size,
        } => {
            let options = logs::LogsOptions {
                workflow: session.workflow(workflow)?,
                filters: filters.clone(),
                json: *json,
                page: *page,
                size: *size,
            };
            logs::run(&session.client(auth)?, &options)
        }
        Commands::Du {
            auth,
            workflow,
            summarize,
            human_readable,
            filters,
            ..
        } => {
            let options = du::DuOptions {
                workflow: session.workflow(workflow)?,
                filters: filters.clone(),
                summarize: *summarize,
                human_readable: *human_readable,
            };
            du::run(&session.client(auth)?, &options)
        }
        Commands::SecretsAdd {
            auth,
            env,
            files,
            overwrite,
        } => {
            let options = secrets_add::SecretsAddOptions {
                env: env.clone(),
                files: files.clone(),
                overwrite: *overwrite,
            };
            secrets_add::run(&session.client(auth)?, &options)
        }
    }
}
