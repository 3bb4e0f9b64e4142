#![deny(unsafe_code)]
//! CLI binary for the creature sprite generator.
//!
//! Subcommands:
//! - `params` prints the synthesized parameters for a seed
//! - `palette` prints the synthesized palette for a seed
//! - `render` writes one PNG per body part plus `manifest.json`
//! - `list` prints the shape and pattern kinds

mod error;

use clap::{Parser, Subcommand};
use creature_sprite::snapshot::write_creature;
use creature_sprite::CreatureSprites;
use creature_sprite_core::{
    synthesize_palette, synthesize_parameters, CreatureRecipe, PatternKind, RenderConfig,
    ShapeKind,
};
use error::CliError;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "creature-sprite", about = "Procedural creature sprite generator")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the creature parameters synthesized from a seed.
    Params {
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Print the color palette synthesized from a seed.
    Palette {
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Generate every body part and write PNGs plus a manifest.
    Render {
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Reference torso size in pixels (32..=256).
        #[arg(short, long)]
        resolution: Option<usize>,

        /// Skip the torso pattern overlay.
        #[arg(long)]
        no_patterns: bool,

        /// Skip optional details (humps, plates, spines, horns, claws).
        #[arg(long)]
        no_details: bool,

        /// Render config overrides as a JSON object.
        #[arg(long, default_value = "{}")]
        config: String,

        /// Output directory.
        #[arg(short, long, default_value = "creature")]
        output: PathBuf,
    },
    /// List shape and pattern kinds.
    List,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Params { seed } => {
            let params = synthesize_parameters(seed);
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
        Command::Palette { seed } => {
            let palette = synthesize_palette(seed);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&palette)?);
            } else {
                println!("scheme:    {:?}", palette.scheme);
                println!("primary:   {}", palette.primary.to_hex());
                println!("secondary: {}", palette.secondary.to_hex());
                println!("accent:    {}", palette.accent.to_hex());
                match palette.pattern {
                    Some(c) => println!("pattern:   {}", c.to_hex()),
                    None => println!("pattern:   (accent)"),
                }
            }
        }
        Command::Render {
            seed,
            resolution,
            no_patterns,
            no_details,
            config,
            output,
        } => {
            let overrides: serde_json::Value =
                serde_json::from_str(&config).map_err(CliError::ConfigSyntax)?;
            let mut config =
                RenderConfig::from_json(&overrides).map_err(CliError::InvalidRecipe)?;
            if let Some(resolution) = resolution {
                config = config.with_resolution(resolution);
            }
            if no_patterns {
                config = config.with_patterns(false);
            }
            if no_details {
                config = config.with_details(false);
            }
            let recipe = CreatureRecipe::new(seed).with_config(config);
            recipe.validate().map_err(CliError::InvalidRecipe)?;

            log::info!("rendering seed {seed} at resolution {}", config.resolution);
            let sprites = CreatureSprites::generate(&recipe)?;
            let written = write_creature(&sprites, &output)?;
            log::info!("wrote {} files to {}", written.len(), output.display());

            if cli.json {
                let info = serde_json::json!({
                    "seed": seed,
                    "config": config,
                    "parts": sprites.parts().len(),
                    "output": output.display().to_string(),
                    "files": written
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered seed {seed} ({} parts, {:?} palette) -> {}",
                    sprites.parts().len(),
                    sprites.palette().scheme,
                    output.display()
                );
            }
        }
        Command::List => {
            let shapes = ShapeKind::NAMES;
            let patterns: Vec<&str> = PatternKind::ALL.iter().map(|k| k.name()).collect();
            if cli.json {
                let info = serde_json::json!({
                    "shapes": shapes,
                    "patterns": patterns,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Shapes:");
                for name in shapes {
                    println!("  {name}");
                }
                println!("Patterns:");
                println!("  {}", patterns.join(", "));
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
