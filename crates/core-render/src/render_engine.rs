//! RenderEngine: emits composed frames (or only the status row) to the terminal.
//!
//! Full frames are written row-major, one `MoveTo` per row so a wide
//! character near the edge can never wrap into the next row. The status path
//! repaints only the last row and is skipped when its text is unchanged.

use crate::timing::{elapsed_ns, record_full_ns, record_status_ns};
use crate::writer::Writer;
use crate::{CellFlags, Frame};
use anyhow::Result;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

#[derive(Debug, Default)]
pub struct RenderPathMetrics {
    pub full_frames: AtomicU64,
    pub status_frames: AtomicU64,
    pub status_skipped: AtomicU64,
    pub print_commands: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPathMetricsSnapshot {
    pub full_frames: u64,
    pub status_frames: u64,
    pub status_skipped: u64,
    pub print_commands: u64,
}

impl RenderPathMetrics {
    pub fn snapshot(&self) -> RenderPathMetricsSnapshot {
        RenderPathMetricsSnapshot {
            full_frames: self.full_frames.load(Relaxed),
            status_frames: self.status_frames.load(Relaxed),
            status_skipped: self.status_skipped.load(Relaxed),
            print_commands: self.print_commands.load(Relaxed),
        }
    }
}

#[derive(Debug, Default)]
pub struct RenderEngine {
    metrics: RenderPathMetrics,
    prev_status: Option<String>,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics_snapshot(&self) -> RenderPathMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn invalidate_for_resize(&mut self) {
        self.prev_status = None;
    }

    pub fn render_full(&mut self, frame: &Frame, status: &str) -> Result<()> {
        let mut out = std::io::stdout();
        self.render_full_to(frame, status, &mut out)
    }

    /// `status` is the text already composed into the frame's last row; it
    /// seeds the skip cache for later status-only repaints.
    pub fn render_full_to<W: Write>(&mut self, frame: &Frame, status: &str, out: &mut W) -> Result<()> {
        let start = std::time::Instant::now();
        let mut writer = Writer::new();
        for y in 0..frame.height {
            writer.move_to(0, y);
            for (_x, text, flags) in frame.row_runs(y) {
                writer.print(text, flags);
            }
        }
        self.metrics
            .print_commands
            .fetch_add(writer.print_commands(), Relaxed);
        writer.flush_to(out)?;
        self.prev_status = Some(status.to_string());
        self.metrics.full_frames.fetch_add(1, Relaxed);
        let ns = elapsed_ns(start);
        record_full_ns(ns);
        tracing::trace!(target: "render.engine", ns, rows = frame.height, "full_frame");
        Ok(())
    }

    pub fn render_status(&mut self, status: &str, width: u16, height: u16) -> Result<()> {
        let mut out = std::io::stdout();
        self.render_status_to(status, width, height, &mut out)
            .map(|_| ())
    }

    /// Repaint only the last row. Returns false when skipped (unchanged text).
    pub fn render_status_to<W: Write>(
        &mut self,
        status: &str,
        width: u16,
        height: u16,
        out: &mut W,
    ) -> Result<bool> {
        if height == 0 || self.prev_status.as_deref() == Some(status) {
            self.metrics.status_skipped.fetch_add(1, Relaxed);
            return Ok(false);
        }
        let start = std::time::Instant::now();
        let mut row = Frame::new(width, 1);
        row.put_str(0, 0, status, width, CellFlags::empty());
        let mut writer = Writer::new();
        writer.move_to(0, height - 1);
        writer.clear_line();
        for (_x, text, flags) in row.row_runs(0) {
            writer.print(text, flags);
        }
        self.metrics
            .print_commands
            .fetch_add(writer.print_commands(), Relaxed);
        writer.flush_to(out)?;
        self.prev_status = Some(status.to_string());
        self.metrics.status_frames.fetch_add(1, Relaxed);
        record_status_ns(elapsed_ns(start));
        Ok(true)
    }
}
