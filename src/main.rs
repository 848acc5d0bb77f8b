mod cli;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Logs go to stderr so reports on stdout stay pipeable. `JSON_GUARD_LOG`
/// takes the usual `EnvFilter` syntax and wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "json_guard=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("JSON_GUARD_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let command_line_interface = cli::CommandLineInterface::load();
    init_tracing(command_line_interface.verbose);
    match command_line_interface.run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}
