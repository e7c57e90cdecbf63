//! dbdelta CLI - versioned XML schema migrations

use anyhow::Result;
use clap::Parser;
use dd_core::Direction;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::common::ExitCode;
use commands::{create, migrate, status};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if let Err(err) = run(&cli) {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Create(args) => create::execute(args, &cli.global),
        cli::Commands::Up(args) => migrate::execute(Direction::Up, args, &cli.global),
        cli::Commands::Down(args) => migrate::execute(Direction::Down, args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
    }
}

/// `warn` by default, `debug` with --verbose; `RUST_LOG` wins over both
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}
