//! # Shades CLI
//!
//! Command-line interface for rendering scenes and demos to images.
//!
//! ## Usage
//!
//! ```bash
//! # List available demos
//! shades list
//!
//! # Render a built-in demo
//! shades demo marble --out marble.png
//!
//! # Reproducible render at a custom size
//! shades demo swirl --out swirl.png --width 1000 --height 600 --seed 7
//!
//! # Render a JSON scene file
//! shades render scene.json --out scene.png
//!
//! # More logging
//! RUST_LOG=shades=debug shades demo blobs --out blobs.png
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shades::{Canvas, SceneDocument, ShadesError, demos};

/// Shades - generative 2D drawing
#[derive(Parser, Debug)]
#[command(name = "shades")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a JSON scene file
    Render {
        /// Scene file
        scene: PathBuf,

        /// Output image (format follows the extension)
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },

    /// Render a built-in demo
    Demo {
        /// Demo name (see `shades list`)
        name: String,

        /// Output image (format follows the extension)
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Canvas width in pixels
        #[arg(long, default_value_t = Canvas::DEFAULT_SIZE)]
        width: u32,

        /// Canvas height in pixels
        #[arg(long, default_value_t = Canvas::DEFAULT_SIZE)]
        height: u32,

        /// Seed for every random choice (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List available demos
    List,
}

fn main() {
    init_tracing();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), ShadesError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            println!("Available demos:");
            for name in demos::DEMOS {
                println!("  {}", name);
            }
        }

        Commands::Render { scene, out } => {
            let document = SceneDocument::from_path(&scene)?;
            let canvas = document.render()?;
            canvas.save(&out)?;
            println!("Saved to {}", out.display());
        }

        Commands::Demo {
            name,
            out,
            width,
            height,
            seed,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            info!(demo = %name, seed, "rendering demo");
            let mut rng = StdRng::seed_from_u64(seed);
            let canvas = demos::render(&name, width, height, &mut rng)?;
            canvas.save(&out)?;
            println!("Saved to {} (seed {})", out.display(), seed);
        }
    }

    Ok(())
}
