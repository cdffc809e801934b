mod cache;
mod cli;
mod config;
mod discovery;
mod errors;
mod extract;
mod models;
mod platform;
mod providers;
mod ui;
mod utils;
mod verify;

use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = cli.run().await {
        #[cfg(debug_assertions)]
        {
            eprintln!("{err:?}");
        }

        #[cfg(not(debug_assertions))]
        {
            eprintln!(
                "{}",
                err.chain().map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
            );
        }

        std::process::exit(1);
    }
}
