//! tsbind CLI - generate ReasonML bindings from a TypeScript declaration file

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tsbind::EmitOptions;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "tsbind")]
#[command(version)]
#[command(about = "Generate ReasonML (BuckleScript) bindings from TypeScript declaration files")]
#[command(long_about = r#"
tsbind reads a .d.ts declaration file and emits ReasonML binding source text:
forward opaque types, nested module blocks, and externals wired to the
declared namespace paths.

Example usage:
  tsbind input.d.ts
  tsbind input.d.ts -o bindings.re
  tsbind input.d.ts --dump-model
"#)]
struct Cli {
    /// Path to the declaration file
    input: PathBuf,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Columns per indentation level
    #[arg(long, default_value = "2")]
    indent: usize,

    /// Print the normalized declaration model as JSON instead of bindings
    #[arg(long)]
    dump_model: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let text = if cli.dump_model {
        let source = std::fs::read_to_string(&cli.input)
            .with_context(|| format!("source not found: {}", cli.input.display()))?;
        let nodes = tsbind::build_model(&source)?;
        serde_json::to_string_pretty(&nodes)?
    } else {
        let options = EmitOptions { indent: cli.indent };
        tsbind::generate_file(&cli.input, &options)?
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &text)
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}
