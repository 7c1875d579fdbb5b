//! Frame-stream boundary
//!
//! The simulation never draws pixels. It hands an ordered frame sequence to
//! a sink; pixel drawing, palettes and GIF assembly belong to whatever
//! consumes the stream. Frame rate and watermark text are rendering
//! concerns, so they travel as opaque metadata alongside the frames rather
//! than influencing the simulation.

use std::io::Write;

use serde::Serialize;

use crate::sim::{FrameState, Playfield};
use crate::error::Error;

/// Rendering metadata forwarded untouched to the consumer
#[derive(Debug, Clone, Serialize)]
pub struct RenderOptions {
    /// Target playback rate, frames per second
    pub fps: u32,
    /// Optional overlay text
    pub watermark: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fps: 40,
            watermark: None,
        }
    }
}

/// Ordered consumer of the frame sequence
pub trait FrameSink {
    fn push(&mut self, frame: &FrameState) -> Result<(), Error>;

    /// Called once after the final frame
    fn finish(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Stream header written before the first frame
#[derive(Debug, Clone, Serialize)]
struct StreamHeader<'a> {
    playfield: &'a Playfield,
    options: &'a RenderOptions,
}

/// JSON-lines frame stream: one metadata line, then one frame per line.
///
/// Kept deliberately dumb so a renderer in any language can replay it.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    frames_written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(mut writer: W, playfield: &Playfield, options: &RenderOptions) -> Result<Self, Error> {
        let header = StreamHeader { playfield, options };
        serde_json::to_writer(&mut writer, &header)?;
        writer.write_all(b"\n")?;
        Ok(Self {
            writer,
            frames_written: 0,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn push(&mut self, frame: &FrameState) -> Result<(), Error> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), Error> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory sink, mostly for tests and programmatic consumers
#[derive(Debug, Default)]
pub struct CollectSink {
    pub frames: Vec<FrameState>,
}

impl FrameSink for CollectSink {
    fn push(&mut self, frame: &FrameState) -> Result<(), Error> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
