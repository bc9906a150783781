// src/main.rs

use charm::errors::CharmError;
use charm::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("charm error: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run_main() -> Result<(), CharmError> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
