//! Per-event frame recording.
//!
//! The engine hands a `Frame` to a `FrameSink` after every resolved event.
//! `TextFrameWriter` produces the plain-text artifact consumed by the analysis
//! scripts; `MemorySink` keeps frames in memory.

use crate::core::particle::Particle;
use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Snapshot of the session right after one resolved event.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub time: f64,
    pub wall_pressure: f64,
    pub obstacle_pressure: f64,
    pub temperature: f64,
    /// Distinct particles that have hit the obstacle at least once.
    pub obstacle_first_hits: u64,
    /// All particle-obstacle collisions so far.
    pub obstacle_collisions: u64,
    pub particles: &'a [Particle],
}

/// Consumer of engine frames.
pub trait FrameSink {
    /// Record one frame.
    fn record(&mut self, frame: &Frame<'_>) -> Result<()>;

    /// Called once when the run ends. Flush buffers here.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn record(&mut self, _frame: &Frame<'_>) -> Result<()> {
        Ok(())
    }
}

/// Owned copy of a `Frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedFrame {
    pub time: f64,
    pub wall_pressure: f64,
    pub obstacle_pressure: f64,
    pub temperature: f64,
    pub obstacle_first_hits: u64,
    pub obstacle_collisions: u64,
    pub particles: Vec<Particle>,
}

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub frames: Vec<OwnedFrame>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for MemorySink {
    fn record(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.frames.push(OwnedFrame {
            time: frame.time,
            wall_pressure: frame.wall_pressure,
            obstacle_pressure: frame.obstacle_pressure,
            temperature: frame.temperature,
            obstacle_first_hits: frame.obstacle_first_hits,
            obstacle_collisions: frame.obstacle_collisions,
            particles: frame.particles.to_vec(),
        });
        Ok(())
    }
}

/// Line-oriented text writer.
///
/// Layout: the particle count on the first line, then per frame the time,
/// wall pressure, obstacle pressure, temperature, first-time obstacle hits and
/// total obstacle hits (one value per line), followed by one
/// `x y vx vy radius` line per particle.
pub struct TextFrameWriter<W: Write> {
    out: W,
    particle_count: usize,
    header_written: bool,
    frames_written: usize,
}

impl<W: Write> TextFrameWriter<W> {
    pub fn new(out: W, particle_count: usize) -> Self {
        Self {
            out,
            particle_count,
            header_written: false,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn ensure_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(self.out, "{}", self.particle_count)?;
            self.header_written = true;
        }
        Ok(())
    }
}

/// Buffered text writer backed by a file.
pub type FileFrameWriter = TextFrameWriter<BufWriter<File>>;

/// Path of the artifact for a run with `particle_count` particles.
pub fn artifact_path(dir: &Path, particle_count: usize) -> PathBuf {
    dir.join(format!("output-{particle_count}.txt"))
}

impl FileFrameWriter {
    /// Create `dir/output-{particle_count}.txt`, replacing any previous artifact.
    pub fn create_file(dir: &Path, particle_count: usize) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let file = File::create(artifact_path(dir, particle_count))?;
        Ok(Self::new(BufWriter::new(file), particle_count))
    }
}

impl<W: Write> FrameSink for TextFrameWriter<W> {
    fn record(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.ensure_header()?;
        writeln!(self.out, "{:.6e}", frame.time)?;
        writeln!(self.out, "{:.6e}", frame.wall_pressure)?;
        writeln!(self.out, "{:.6e}", frame.obstacle_pressure)?;
        writeln!(self.out, "{:.6e}", frame.temperature)?;
        writeln!(self.out, "{}", frame.obstacle_first_hits)?;
        writeln!(self.out, "{}", frame.obstacle_collisions)?;
        for p in frame.particles {
            writeln!(
                self.out,
                "{:.6e} {:.6e} {:.6e} {:.6e} {:.6e}",
                p.r[0], p.r[1], p.v[0], p.v[1], p.radius
            )?;
        }
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.ensure_header()?;
        self.out.flush()?;
        Ok(())
    }
}
