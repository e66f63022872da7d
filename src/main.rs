use std::env;
use std::process;

use tracing_subscriber::EnvFilter;

use battle_report::cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("battle_report=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    process::exit(cli::run_with_args(&args));
}
