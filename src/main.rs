use clap::{Parser, Subcommand};
use coverage_docs::{config, output, pipeline};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coverage-docs")]
#[command(about = "Generate coverage documentation from per-county JSON descriptors")]
#[command(long_about = "\
Generate coverage documentation from per-county JSON descriptors

Each JSON file under the source tree describes one county or one state.
A two-character US Census GEOID marks a state record; anything longer is a
county.

Source structure:

  src/
  ├── CA/
  │   ├── data.json              # State record (geoid \"06\")
  │   ├── los_angeles.json       # County record (geoid \"06037\")
  │   └── orange.json
  └── TX/
      └── harris.json

Output:

  content/
  ├── counties/ca/los_angeles.md # Front matter + county page
  └── states/ca/
      ├── data.json              # Synthesized state record
      └── README.md              # Counties table + layer tables

Run 'coverage-docs gen-config' to generate a documented coverage-docs.toml.")]
#[command(version)]
struct Cli {
    /// Source tree of coverage records (overrides the config file)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Content root receiving counties/ and states/ (overrides the config file)
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Config file [default: coverage-docs.toml, if present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate county pages and state indexes
    Build,
    /// Validate the source tree without writing anything
    Check,
    /// Print a stock coverage-docs.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Build => {
            let config = resolve_config(&cli)?;
            println!(
                "==> Building {} \u{2192} {}",
                config.source.display(),
                config.content.display()
            );
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_build_event(&event);
                }
            });
            // The sender is dropped when build returns, which ends the printer.
            let result = pipeline::build(&config, Some(tx));
            if printer.join().is_err() {
                eprintln!("Warning: output printer stopped early");
            }
            output::print_summary(&result?);
        }
        Command::Check => {
            let config = resolve_config(&cli)?;
            println!("==> Checking {}", config.source.display());
            let entries = pipeline::check(&config)?;
            output::print_check_output(&entries, &config.source);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file, then apply command-line path overrides.
fn resolve_config(cli: &Cli) -> Result<config::Config, config::ConfigError> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    if let Some(content) = &cli.content {
        config.content = content.clone();
    }
    Ok(config)
}
