// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { recipe, json } => commands::cmd_inspect(&recipe, json),
        Commands::Generate {
            recipe,
            build_folder,
        } => commands::cmd_generate(&recipe, build_folder),
        Commands::Cook {
            recipe,
            build_folder,
            package_folder,
            jobs,
            configure_args,
            json,
        } => commands::cmd_cook(
            &recipe,
            build_folder,
            package_folder,
            jobs,
            configure_args,
            json,
        ),
        Commands::Describe { recipe } => commands::cmd_describe(&recipe),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "brigade",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
