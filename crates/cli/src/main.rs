//! Sitecheck CLI - site audits from the command line

use clap::Parser;
use sitecheck_cli::{commands, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        None | Some(Commands::Audit) => commands::audit::run(&cli.audit, cli.format)?.code(),
        Some(Commands::Validate {
            ref base_url,
            ref report_dir,
        }) => commands::validate::run(base_url, report_dir, cli.format)?.code(),
        Some(Commands::Init { ref path }) => {
            commands::init::run(path.as_deref())?;
            0
        }
    };

    std::process::exit(code);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "sitecheck_core=debug,sitecheck_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .init();
}
