use clap::Parser;
use form_pilot::cli::commands::{FillArgs, cmd_capture, cmd_delete, cmd_fill, cmd_list, cmd_score};
use form_pilot::cli::config::{Cli, Commands, load_config, load_config_file};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config.as_deref() {
        Some(path) => load_config_file(path)?,
        None => load_config(None),
    };
    let store_path = config.store_path(cli.store.as_deref()).to_string();
    let policy = config.engine_policy();

    match cli.command {
        Commands::Capture {
            page,
            name,
            source_url,
        } => {
            cmd_capture(&page, name.as_deref(), source_url.as_deref(), &store_path, &policy)?;
        }
        Commands::Fill {
            page,
            templates,
            output,
            auto_next,
            trace,
        } => {
            let args = FillArgs {
                page: &page,
                templates: &templates,
                output: output.as_deref(),
                auto_next,
                trace: trace.as_deref(),
            };
            let outcome = cmd_fill(&args, &store_path, &policy)?;
            if !outcome.ok {
                std::process::exit(1);
            }
        }
        Commands::List => cmd_list(&store_path)?,
        Commands::Delete { id } => cmd_delete(&store_path, &id)?,
        Commands::Score { a, b } => cmd_score(&a, &b)?,
    }

    Ok(())
}
