mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use orchardops::app::{self, App};
use orchardops::config::{self, Config};
use orchardops::report;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let data_dir = cli.data_dir.as_ref();

    match cli.command {
        Commands::Evaluate(args) => {
            let snapshot = match args.read_snapshot(std::io::stdin().lock()) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(cli::exit_code(&e));
                }
            };

            let app = App::new(config, data_dir);
            let state = app.evaluate(&snapshot);
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
                OutputFormat::Text => print!("{}", report::render_state(&state)),
            }
        }
        Commands::Stages { format } => {
            let app = App::new(config, data_dir);
            let stages = app.stages().context("Failed to load stage table")?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stages)?),
                OutputFormat::Text => print!("{}", report::render_stages(&stages)),
            }
        }
        Commands::ImportStages { path } => {
            let stages = config::load_stage_file(&path)
                .with_context(|| format!("Failed to read stages from {}", path.display()))?;
            let (count, db_path) = app::import_stages(&stages, data_dir)?;
            println!("Imported {} stages into {}", count, db_path.display());
            if config.phenology.source != config::StageSourceKind::Database {
                println!(
                    "Note: phenology.source is '{}'; set it to 'database' to use this table",
                    config.phenology.source
                );
            }
        }
        Commands::Rules => {
            let app = App::new(config, data_dir);
            for (id, name) in app.evaluator.rules().list_rules() {
                println!("{:<16} {}", id, name);
            }
        }
        Commands::Check => {
            let app = App::new(config, data_dir);
            let report = app.check().context("Stage table check failed")?;
            println!(
                "Stage source: {} ({} stages)",
                report.source, report.stage_count
            );
            println!("Thresholds: {:?}", app.evaluator.thresholds());
            if report.problems.is_empty() {
                println!("OK");
            } else {
                for problem in &report.problems {
                    println!("warning: {}", problem);
                }
            }
        }
    }

    Ok(())
}
