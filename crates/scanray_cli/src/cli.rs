use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use scanray_renderer::RenderConfig;

/// Log levels selectable on the command line
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Output image dimensions, written `WIDTHxHEIGHT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Parse `800x600` style sizes.
pub fn parse_size(s: &str) -> Result<ImageSize, String> {
    let (width, height) = s
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("invalid size '{}', expected WIDTHxHEIGHT", s))?;

    let parse = |field: &str, name: &str| -> Result<u32, String> {
        match field.trim().parse::<u32>() {
            Ok(0) => Err(format!("{} must be greater than zero", name)),
            Ok(value) => Ok(value),
            Err(e) => Err(format!("invalid {} '{}': {}", name, field, e)),
        }
    };

    Ok(ImageSize {
        width: parse(width, "width")?,
        height: parse(height, "height")?,
    })
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "scanray")]
#[command(about = "A multithreaded sphere ray tracer writing binary PPM images")]
pub struct Args {
    /// Number of worker threads
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Image size in pixels
    #[arg(short, long, default_value = "800x600", value_parser = parse_size)]
    pub size: ImageSize,

    /// Rays (samples) per pixel
    #[arg(short, long, default_value_t = 1)]
    pub rays: u32,

    /// Scene description file (reads stdin if omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output PPM file (writes stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pin worker i to CPU core i
    #[arg(short, long)]
    pub pin: bool,

    /// Seed for the anti-aliasing jitter tables
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Render settings requested by these arguments.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.size.width,
            height: self.size.height,
            threads: self.threads,
            samples_per_pixel: self.rays,
            pin_threads: self.pin,
            seed: self.seed,
        }
    }
}
