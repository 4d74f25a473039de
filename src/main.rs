use reana_client::display::{MessageKind, display_message};
use reana_client::{cli_parse, init_tracing, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli_parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            display_message(&format!("{err:#}"), MessageKind::Error, false);
            ExitCode::FAILURE
        }
    }
}
