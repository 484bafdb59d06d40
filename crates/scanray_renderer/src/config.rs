//! Render configuration.

use log::warn;
use thiserror::Error;

/// Errors for render settings that cannot be used.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid image size {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("Thread count must be at least 1")]
    ZeroThreads,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels (one scanline per row)
    pub height: u32,
    /// Number of worker threads
    pub threads: usize,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Pin worker i to core i
    pub pin_threads: bool,
    /// Seed for the jitter tables
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            threads: 1,
            samples_per_pixel: 1,
            pin_threads: false,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Create a config for the given resolution with default settings.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Set the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set samples per pixel.
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    /// Set the jitter seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Check the settings, reducing the thread count to one per scanline
    /// if it exceeds the image height.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }

        let scanlines = self.height as usize;
        if self.threads > scanlines {
            warn!(
                "more threads than scanlines specified, reducing number of threads to {}",
                scanlines
            );
            self.threads = scanlines;
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RenderConfig::default();
        assert_eq!(config.clone().validate(), Ok(config));
    }

    #[test]
    fn test_threads_clamped_to_height() {
        let config = RenderConfig::new(64, 10).with_threads(50).validate().unwrap();
        assert_eq!(config.threads, 10);
    }

    #[test]
    fn test_invalid_settings() {
        assert_eq!(
            RenderConfig::new(0, 10).validate(),
            Err(ConfigError::ZeroDimension { width: 0, height: 10 })
        );
        assert_eq!(
            RenderConfig::new(10, 10).with_samples(0).validate(),
            Err(ConfigError::ZeroSamples)
        );
        assert_eq!(
            RenderConfig::new(10, 10).with_threads(0).validate(),
            Err(ConfigError::ZeroThreads)
        );
    }

    #[test]
    fn test_aspect() {
        assert!((RenderConfig::new(800, 600).aspect() - 4.0 / 3.0).abs() < 1e-12);
    }
}
