mod cli;
mod config;
mod logging;
mod mail;
mod model;
mod tui;
mod wizard;

use std::process;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
