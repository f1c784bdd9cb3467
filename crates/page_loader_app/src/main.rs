mod cli;
mod logging;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::initialize(cli.log_destination(), cli.log_level());

    if let Err(err) = cli.run().await {
        eprintln!("page-loader error: {err:#}");
        std::process::exit(1);
    }
}
