use clap::Parser;
use tracing_subscriber::EnvFilter;

use wardmap::cli::{Cli, Commands};
use wardmap::commands::{render, report};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "wardmap=info",
        _ => "wardmap=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Report(args) => report::run(&cli, args),
        Commands::Render(args) => render::run(&cli, args),
    }
}
