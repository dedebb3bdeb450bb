//! Aptviz CLI binary.

use aptviz::cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v; logs go to stderr so stdout stays pure DOT.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting aptviz");

    match cli.execute() {
        Ok(code) => code,
        Err(err) => {
            let out = aptviz::output::OutputConfig::from_env();
            eprintln!("{} {err}", aptviz::output::error("error:", &out));
            for cause in err.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}
