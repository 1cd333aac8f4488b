use std::env;
use std::io;
use std::process;

use anyhow::Context;
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use minefield::config::{self, Config};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = env::args().skip(1).join(" ");
    if config::wants_help(&args) {
        println!("{}", config::USAGE);
        return
    }

    let result = Config::from_args(&args)
        .context("bad arguments")
        .and_then(minefield::game_loop);
    if let Err(e) = result {
        eprintln!("{:?}", e);
        eprintln!("{}", config::USAGE);
        process::exit(1);
    }
}
