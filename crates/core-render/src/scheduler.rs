//! Render scheduler.
//!
//! Producers report invalidation intents (`RenderDelta`) via `mark` while
//! handling a batch of events; `consume` merges them into one `Decision`.
//!
//! Merge semantics:
//! - Any `Full` in the queue makes the decision `Full`.
//! - Otherwise `StatusLine` (hover hint or ephemeral message changed).
//! - `effective` escalates to `Full` when no frame has been painted since the
//!   last resize, because a status-only repaint needs an intact frame below it.

use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDelta {
    /// Layout, visibility, focus or toolbar changed: rebuild the frame.
    Full,
    /// Only the status row changed.
    StatusLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub semantic: RenderDelta,
    pub effective: RenderDelta,
}

#[derive(Debug, Default)]
pub struct RenderDeltaMetrics {
    full: AtomicU64,
    status_line: AtomicU64,
    escalated: AtomicU64,
    semantic_frames: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDeltaMetricsSnapshot {
    pub full: u64,
    pub status_line: u64,
    pub escalated: u64,
    pub semantic_frames: u64,
}

impl RenderDeltaMetrics {
    pub fn snapshot(&self) -> RenderDeltaMetricsSnapshot {
        RenderDeltaMetricsSnapshot {
            full: self.full.load(Relaxed),
            status_line: self.status_line.load(Relaxed),
            escalated: self.escalated.load(Relaxed),
            semantic_frames: self.semantic_frames.load(Relaxed),
        }
    }
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: Vec<RenderDelta>,
    painted_since_invalidate: bool,
    metrics: RenderDeltaMetrics,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics_snapshot(&self) -> RenderDeltaMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn mark(&mut self, delta: RenderDelta) {
        tracing::trace!(target: "render.scheduler", ?delta, "render_mark");
        self.pending.push(delta);
    }

    pub fn mark_status(&mut self) {
        self.mark(RenderDelta::StatusLine);
    }

    /// Forget the painted frame (terminal resize) and request a full repaint.
    pub fn invalidate(&mut self) {
        self.painted_since_invalidate = false;
        self.mark(RenderDelta::Full);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn consume(&mut self) -> Option<Decision> {
        if self.pending.is_empty() {
            return None;
        }
        let semantic = if self.pending.contains(&RenderDelta::Full) {
            RenderDelta::Full
        } else {
            RenderDelta::StatusLine
        };
        self.pending.clear();
        self.metrics.semantic_frames.fetch_add(1, Relaxed);
        let effective = if self.painted_since_invalidate {
            semantic
        } else {
            if semantic != RenderDelta::Full {
                self.metrics.escalated.fetch_add(1, Relaxed);
            }
            RenderDelta::Full
        };
        match effective {
            RenderDelta::Full => self.metrics.full.fetch_add(1, Relaxed),
            RenderDelta::StatusLine => self.metrics.status_line.fetch_add(1, Relaxed),
        };
        self.painted_since_invalidate = true;
        tracing::trace!(target: "render.scheduler", ?semantic, ?effective, "render_decision");
        Some(Decision {
            semantic,
            effective,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_yields_nothing() {
        let mut s = RenderScheduler::new();
        assert_eq!(s.consume(), None);
    }

    #[test]
    fn first_status_request_escalates_to_full() {
        let mut s = RenderScheduler::new();
        s.mark_status();
        let d = s.consume().unwrap();
        assert_eq!(d.semantic, RenderDelta::StatusLine);
        assert_eq!(d.effective, RenderDelta::Full);
        s.mark_status();
        assert_eq!(s.consume().unwrap().effective, RenderDelta::StatusLine);
        assert_eq!(s.metrics_snapshot().escalated, 1);
    }

    #[test]
    fn full_wins_over_status() {
        let mut s = RenderScheduler::new();
        s.mark(RenderDelta::Full);
        s.consume();
        s.mark_status();
        s.mark(RenderDelta::Full);
        s.mark_status();
        assert_eq!(s.consume().unwrap().semantic, RenderDelta::Full);
        assert!(!s.has_pending());
    }

    #[test]
    fn invalidate_forces_full() {
        let mut s = RenderScheduler::new();
        s.mark(RenderDelta::Full);
        s.consume();
        s.invalidate();
        s.mark_status();
        assert_eq!(s.consume().unwrap().effective, RenderDelta::Full);
    }
}
