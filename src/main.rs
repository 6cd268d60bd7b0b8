mod cli;
mod error;
mod fmt;
mod loader;
mod matcher;
mod models;
mod normalize;
mod reports;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "namesake=warn",
        1 => "namesake=info",
        _ => "namesake=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = cli.data_dir.as_deref();
    let format = cli.format;
    let result = match cli.command {
        Commands::Init => cli::init::run(cli.data_dir.clone()),
        Commands::Status => cli::status::run(data_dir),
        Commands::Exact => cli::analyze::exact(data_dir, format),
        Commands::Suspects { sole_proprietors } => cli::analyze::suspects(data_dir, format, sole_proprietors),
        Commands::Scan { raw_pattern } => cli::analyze::scan(data_dir, format, raw_pattern),
        Commands::SelfNamed => cli::analyze::self_named(data_dir, format),
        Commands::Deputy { name } => cli::deputy::run(data_dir, &name),
        Commands::Run { raw_pattern } => cli::analyze::run(data_dir, format, raw_pattern),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
