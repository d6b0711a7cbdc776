mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod run;
mod store;
mod timer;
mod utils;

use clap::Parser;

use app::{CommandContext, handle_command};
use cli::Cli;
use config::Config;
use utils::set_debug;

fn main() {
    let cli = Cli::parse();

    // Keep machine-readable output clean
    let quiet = cli.command.as_ref().is_some_and(|c| c.is_json());
    let config = if quiet {
        Config::load_quiet()
    } else {
        Config::load()
    };
    let cli = cli.with_config(&config);
    set_debug(cli.debug);

    let result = CommandContext::new(&cli).and_then(|ctx| handle_command(&ctx));
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
