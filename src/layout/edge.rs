//! Overscroll glow drawn over the content at the edge a gesture ran into.
//!
//! A drag past the end pulls the glow up while the finger is down; lifting the
//! finger lets it fade. A fling that hits the end absorbs its velocity into
//! the glow and fades straight away. Fading starts its clock on the first
//! `update`, like the other animators.

use serde::Serialize;
use std::time::Duration;

/// Time a full-strength glow takes to fade out.
pub const EDGE_FADE_DURATION: Duration = Duration::from_millis(250);

/// Fling speed (px/sec) that produces a full-strength glow.
const ABSORB_FULL_VELOCITY: f32 = 8000.0;

/// Weakest glow a fling leaves behind.
const ABSORB_MIN_INTENSITY: f32 = 0.1;

/// A side of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Left side.
    Left,
    /// Top side.
    Top,
    /// Right side.
    Right,
    /// Bottom side.
    Bottom,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];

    fn slot(self) -> usize {
        match self {
            Edge::Left => 0,
            Edge::Top => 1,
            Edge::Right => 2,
            Edge::Bottom => 3,
        }
    }
}

/// One visible glow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeGlow {
    /// Side the glow hugs.
    pub edge: Edge,
    /// Strength in `(0, 1]`.
    pub intensity: f32,
}

/// Glow state for all four edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeEffect {
    intensity: [f32; 4],
    fading: bool,
    last_update: Option<Duration>,
}

impl EdgeEffect {
    /// The finger dragged `distance` px past `edge`, out of `extent` px of viewport.
    pub fn on_pull(&mut self, edge: Edge, distance: f32, extent: f32) {
        if extent <= 0.0 || distance <= 0.0 {
            return;
        }
        let slot = &mut self.intensity[edge.slot()];
        *slot = (*slot + distance / extent).min(1.0);
        self.fading = false;
        self.last_update = None;
    }

    /// A fling hit `edge` moving at `velocity` px/sec.
    pub fn on_absorb(&mut self, edge: Edge, velocity: f32) {
        let strength = (velocity.abs() / ABSORB_FULL_VELOCITY).clamp(ABSORB_MIN_INTENSITY, 1.0);
        let slot = &mut self.intensity[edge.slot()];
        *slot = slot.max(strength);
        self.fading = true;
        self.last_update = None;
    }

    /// The finger lifted; start fading.
    pub fn on_release(&mut self) {
        if !self.is_finished() {
            self.fading = true;
        }
    }

    /// Fade to `now`. Returns true while a fading glow still needs frames.
    pub fn update(&mut self, now: Duration) -> bool {
        if !self.fading || self.is_finished() {
            return false;
        }
        let last = *self.last_update.get_or_insert(now);
        let step = now.saturating_sub(last).as_secs_f32() / EDGE_FADE_DURATION.as_secs_f32();
        for value in &mut self.intensity {
            *value = (*value - step).max(0.0);
        }
        self.last_update = Some(now);
        if self.is_finished() {
            self.fading = false;
            self.last_update = None;
            return false;
        }
        true
    }

    /// True when no edge glows.
    pub fn is_finished(&self) -> bool {
        self.intensity.iter().all(|&value| value <= 0.0)
    }

    /// Drop every glow immediately.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Glows to draw, in left, top, right, bottom order.
    pub fn glows(&self) -> Vec<EdgeGlow> {
        Edge::ALL
            .into_iter()
            .filter_map(|edge| {
                let intensity = self.intensity[edge.slot()];
                (intensity > 0.0).then_some(EdgeGlow { edge, intensity })
            })
            .collect()
    }
}
