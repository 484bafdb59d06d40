//! Scanline scheduling across a fixed pool of worker threads.
//!
//! Workers are spawned once, held at a start gate until setup is done, and
//! then pull scanlines from a shared atomic cursor until the image is
//! exhausted. Each claimed row is written by exactly one worker, so the
//! framebuffer needs no locking.

use std::io;
use std::ops::Range;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use core_affinity::CoreId;
use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::camera::RaySampler;
use crate::config::{ConfigError, RenderConfig};
use crate::framebuffer::{pack_pixel, Framebuffer};
use crate::jitter::JitterTables;
use crate::shader::render_pixel;
use scanray_core::Scene;

/// Number of scanlines a worker claims at a time.
pub const SCANLINE_BLOCK: usize = 1;

/// Errors that abort a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot allocate a framebuffer of {width}x{height} pixels")]
    FramebufferTooLarge { width: u32, height: u32 },

    #[error("Failed to spawn worker thread {index}: {source}")]
    ThreadSpawn { index: usize, source: io::Error },

    #[error("Worker thread {0} panicked")]
    WorkerPanicked(usize),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Timing and work distribution of a finished render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStats {
    /// Time from releasing the workers to joining the last one
    pub elapsed: Duration,
    /// Scanlines rendered by each worker, indexed by worker
    pub rows_per_worker: Vec<usize>,
}

impl RenderStats {
    /// Total scanlines rendered.
    pub fn total_rows(&self) -> usize {
        self.rows_per_worker.iter().sum()
    }
}

/// Hands out scanlines in increasing order, each exactly once.
#[derive(Debug)]
pub struct ScanlineCursor {
    next: AtomicUsize,
    total: usize,
}

impl ScanlineCursor {
    /// Create a cursor over `total` scanlines.
    pub fn new(total: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            total,
        }
    }

    /// Claim the next `block` scanlines. The last range may be shorter.
    /// Returns `None` once every scanline has been handed out.
    pub fn claim(&self, block: usize) -> Option<Range<usize>> {
        let block = block.max(1);
        let start = self.next.fetch_add(block, Ordering::Relaxed);
        if start >= self.total {
            return None;
        }
        Some(start..(start + block).min(self.total))
    }

    /// Total number of scanlines.
    pub fn total(&self) -> usize {
        self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Closed,
    Open,
    Aborted,
}

/// One-shot barrier that releases every waiting worker at once.
#[derive(Debug)]
pub struct StartGate {
    state: Mutex<GateState>,
    signal: Condvar,
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StartGate {
    /// Create a closed gate.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Closed),
            signal: Condvar::new(),
        }
    }

    /// Release all workers to start rendering.
    pub fn open(&self) {
        self.release(GateState::Open);
    }

    /// Release all workers without letting them render.
    pub fn abort(&self) {
        self.release(GateState::Aborted);
    }

    /// Block until the gate is released. Returns `true` if work should
    /// proceed, `false` if the render was aborted.
    pub fn wait(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = self
            .signal
            .wait_while(state, |state| *state == GateState::Closed)
            .unwrap_or_else(PoisonError::into_inner);
        *state == GateState::Open
    }

    fn release(&self, to: GateState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == GateState::Closed {
            *state = to;
        }
        self.signal.notify_all();
    }
}

/// Everything the workers share during one render.
///
/// Immutable apart from the cursor and the pixel slots, each of which is
/// written by the single worker that claimed its row.
pub struct RenderJob<'a> {
    scene: &'a Scene,
    sampler: RaySampler,
    samples: u32,
    width: u32,
    height: u32,
    cursor: ScanlineCursor,
    pixels: Box<[AtomicU32]>,
}

impl<'a> RenderJob<'a> {
    /// Set up a render of `scene` with an already validated config.
    pub fn new(scene: &'a Scene, config: &RenderConfig) -> RenderResult<Self> {
        let too_large = || RenderError::FramebufferTooLarge {
            width: config.width,
            height: config.height,
        };

        let len = (config.width as usize)
            .checked_mul(config.height as usize)
            .ok_or_else(too_large)?;
        let mut pixels: Vec<AtomicU32> = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| too_large())?;
        pixels.extend((0..len).map(|_| AtomicU32::new(0)));

        let jitter = JitterTables::from_seed(config.seed);
        let sampler = RaySampler::new(&scene.camera(), config, jitter);

        Ok(Self {
            scene,
            sampler,
            samples: config.samples_per_pixel,
            width: config.width,
            height: config.height,
            cursor: ScanlineCursor::new(config.height as usize),
            pixels: pixels.into_boxed_slice(),
        })
    }

    /// Claim the next block of scanlines for the calling worker.
    pub fn claim(&self, block: usize) -> Option<Range<usize>> {
        self.cursor.claim(block)
    }

    /// Render every pixel of row `y` into the framebuffer.
    pub fn render_scanline(&self, y: usize) {
        let width = self.width as usize;
        let row = &self.pixels[y * width..(y + 1) * width];

        for (x, slot) in row.iter().enumerate() {
            let color = render_pixel(self.scene, &self.sampler, x as u32, y as u32, self.samples);
            slot.store(pack_pixel(color), Ordering::Relaxed);
        }
    }

    /// Collect the finished image. Only call once every worker is joined.
    pub fn into_framebuffer(self) -> Framebuffer {
        let pixels = self
            .pixels
            .into_vec()
            .into_iter()
            .map(AtomicU32::into_inner)
            .collect();
        Framebuffer::from_packed(self.width, self.height, pixels)
    }
}

/// Core a worker should run on.
#[derive(Debug, Clone, Copy)]
enum Affinity {
    Unpinned,
    Core(CoreId),
    Missing,
}

impl Affinity {
    /// Assign worker i to core i when pinning is enabled.
    fn plan(threads: usize, pin: bool) -> Vec<Affinity> {
        if !pin {
            return vec![Affinity::Unpinned; threads];
        }

        let cores = core_affinity::get_core_ids().unwrap_or_default();
        if cores.is_empty() {
            warn!("Could not query CPU cores, worker threads will not be pinned");
        }
        (0..threads)
            .map(|i| cores.get(i).copied().map_or(Affinity::Missing, Affinity::Core))
            .collect()
    }

    fn apply(self, worker: usize) {
        match self {
            Affinity::Unpinned => {}
            Affinity::Core(core) => {
                if core_affinity::set_for_current(core) {
                    trace!("worker {} pinned to core {}", worker, core.id);
                } else {
                    warn!("Failed to pin worker {} to core {}", worker, core.id);
                }
            }
            Affinity::Missing => warn!("No core available to pin worker {}", worker),
        }
    }
}

/// Worker body: wait for the gate, then render scanlines until none are
/// left. Returns the number of scanlines rendered.
fn worker(index: usize, job: &RenderJob<'_>, gate: &StartGate, affinity: Affinity) -> usize {
    affinity.apply(index);

    if !gate.wait() {
        trace!("worker {} released by abort", index);
        return 0;
    }
    trace!("worker {} started", index);

    let mut rows = 0;
    while let Some(lines) = job.claim(SCANLINE_BLOCK) {
        for y in lines {
            job.render_scanline(y);
            rows += 1;
        }
    }

    trace!("worker {} finished after {} scanlines", index, rows);
    rows
}

/// Render `scene` with the given settings.
///
/// Spawns `config.threads` workers (after clamping to the image height),
/// renders every scanline exactly once, and joins the workers before
/// returning. No image is produced if any worker fails to spawn or panics.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<(Framebuffer, RenderStats)> {
    let config = config.clone().validate()?;

    info!(
        "Rendering {}x{} with {} threads, {} samples per pixel",
        config.width, config.height, config.threads, config.samples_per_pixel
    );

    let job = RenderJob::new(scene, &config)?;
    let gate = StartGate::new();
    let affinity = Affinity::plan(config.threads, config.pin_threads);

    let (elapsed, rows_per_worker) = thread::scope(|s| {
        let job = &job;
        let gate = &gate;

        let mut handles = Vec::with_capacity(config.threads);
        for (index, affinity) in affinity.into_iter().enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("scanray-worker-{}", index))
                .spawn_scoped(s, move || worker(index, job, gate, affinity));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    gate.abort();
                    return Err(RenderError::ThreadSpawn { index, source });
                }
            }
        }

        let start = Instant::now();
        gate.open();

        // Join every worker before inspecting results
        let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();
        let elapsed = start.elapsed();

        let rows = joined
            .into_iter()
            .enumerate()
            .map(|(index, result)| result.map_err(|_| RenderError::WorkerPanicked(index)))
            .collect::<RenderResult<Vec<usize>>>()?;

        Ok((elapsed, rows))
    })?;

    for (index, rows) in rows_per_worker.iter().enumerate() {
        debug!("worker {}: {} scanlines", index, rows);
    }
    info!("Rendered {} scanlines", config.height);

    let stats = RenderStats {
        elapsed,
        rows_per_worker,
    };
    Ok((job.into_framebuffer(), stats))
}
