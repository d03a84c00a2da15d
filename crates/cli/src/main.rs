use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use domsnap_core::units::{self, PageUnit};
use domsnap_core::{output, CloneOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "domsnap", about = "Snapshot HTML documents for offscreen rendering")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an HTML file and print a detached snapshot of it
    Snapshot {
        /// The HTML file to snapshot (use - for stdin)
        file: String,

        /// Keep <script> elements in the snapshot
        #[arg(long)]
        include_scripts: bool,

        /// Fire load listeners as if the snapshot finished loading
        #[arg(long)]
        loaded: bool,

        /// Output as JSON instead of an outline
        #[arg(long)]
        json: bool,
    },
    /// Convert between CSS pixels and page units
    Units {
        /// The value to convert
        #[arg(allow_hyphen_values = true)]
        value: f64,

        /// Page unit (pt, mm, cm, in, px, pc, em, ex)
        #[arg(long, default_value = "mm")]
        unit: String,

        /// Convert page units to pixels instead of pixels to page units
        #[arg(long)]
        to_px: bool,

        /// Keep the fractional part of converted pixels
        #[arg(long)]
        no_floor: bool,
    },
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot {
            file,
            include_scripts,
            loaded,
            json,
        } => {
            let html = read_input(&file)?;
            let options = CloneOptions {
                include_scripts,
                ..Default::default()
            };
            let mut snapshot = domsnap_core::snapshot(&html, &options)
                .with_context(|| format!("failed to snapshot {}", file))?;
            if loaded {
                let fired = snapshot.finish_loading();
                debug!(fired, "snapshot finished loading");
            }

            if json {
                println!("{}", output::to_json(&snapshot)?);
            } else {
                println!("nodes: {}", snapshot.descendant_count());
                println!("---");
                println!("{}", output::to_outline_string(&snapshot));
            }
        }
        Commands::Units {
            value,
            unit,
            to_px,
            no_floor,
        } => {
            let k = unit.parse::<PageUnit>()?.scale_factor();
            if to_px {
                println!("{}", units::to_px(value, k, !no_floor));
            } else {
                println!("{}", units::unit_convert(value, k));
            }
        }
    }

    Ok(())
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file))
    }
}
