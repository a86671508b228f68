use autoplan_cli::{Cli, Commands};
use clap::Parser;
use std::process;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {e}");
    }

    let result = match &cli.command {
        Commands::Solve {
            input,
            config,
            solver,
            time_limit,
            mip_gap,
            format,
            out,
        } => commands::solve::handle(commands::solve::SolveArgs {
            input,
            config: config.as_deref(),
            solver: solver.as_deref(),
            time_limit: *time_limit,
            mip_gap: *mip_gap,
            format: *format,
            out: out.as_deref(),
        }),
        Commands::Validate { input } => commands::validate::handle(input),
        Commands::Inspect { input, constraints } => commands::inspect::handle(input, *constraints),
        Commands::Baseline { out } => commands::baseline::handle(out),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
