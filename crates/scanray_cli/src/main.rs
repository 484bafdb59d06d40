//! scanray - render a sphere scene description to a PPM image.

mod cli;
mod logger;

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use scanray_core::{load_scene, load_scene_file};
use scanray_renderer::render;

use cli::Args;
use logger::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let scene = match &args.input {
        Some(path) => load_scene_file(path)
            .with_context(|| format!("Failed to load scene from {}", path.display()))?,
        None => load_scene(io::stdin().lock()).context("Failed to read scene from stdin")?,
    };

    // Open the output before rendering so a bad path fails fast
    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let (image, stats) = render(&scene, &args.render_config()).context("Render failed")?;
    info!("Rendering took: {} milliseconds", stats.elapsed.as_millis());

    image
        .write_ppm(&mut output)
        .context("Failed to write image")?;

    Ok(())
}
