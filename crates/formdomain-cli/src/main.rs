//! Formdomain CLI: the `formdomain` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Parse { domain, json } => commands::parse::run(domain, json),

        Commands::Eval {
            domain,
            context,
            bias,
            json,
        } => commands::eval::run(domain, context, bias.into(), json),

        Commands::Invert {
            domain,
            symbol,
            context,
            json,
        } => commands::invert::run(domain, symbol, context, json),

        Commands::Simplify { domain, json } => commands::simplify::run(domain, json),

        Commands::Merge { domain, json } => commands::merge::run(domain, json),

        Commands::Concat { domains, or, json } => commands::concat::run(domains, or, json),

        Commands::Localize {
            domain,
            field,
            json,
        } => commands::localize::run(domain, field, false, json),

        Commands::Unlocalize {
            domain,
            field,
            json,
        } => commands::localize::run(domain, field, true, json),

        Commands::UniqueValue { domain, json } => commands::unique_value::run(domain, json),

        Commands::ReferenceModels {
            domain,
            field,
            json,
        } => commands::reference::run_models(domain, field, json),

        Commands::PrepareReference {
            domain,
            field,
            model,
            json,
        } => commands::reference::run_prepare(domain, field, model, json),
    }
}
