//! Point-by-point playback of a saved signature.
//!
//! `Replay` is clock-driven by the host: call [`Replay::on_frame`] once per
//! animation frame with the current time and it draws at most one segment.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use serde::{Deserialize, Serialize};

use crate::render::clear;
use crate::stroke::SignatureData;
use crate::surface::{LineCap, LineJoin, Surface, SurfaceError};

/// Milliseconds between points at speed 1.
const FRAME_INTERVAL_MS: f64 = 16.0;
/// Pause before a looping replay restarts.
const LOOP_DELAY_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayOptions {
    /// Playback speed multiplier; values `<= 0` are treated as 1.
    pub speed: f64,
    #[serde(rename = "loop")]
    pub looped: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self { speed: 1.0, looped: false }
    }
}

impl ReplayOptions {
    fn interval(&self) -> f64 {
        let speed = if self.speed > 0.0 { self.speed } else { 1.0 };
        FRAME_INTERVAL_MS / speed
    }
}

/// Result of one [`Replay::on_frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    /// Not started, or stopped.
    Idle,
    Paused,
    Playing,
    /// Reached the end and will restart after the loop delay.
    Looping,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stopped,
    Playing,
    Paused,
}

pub struct Replay {
    data: SignatureData,
    options: ReplayOptions,
    state: State,
    stroke_index: usize,
    point_index: usize,
    completed_points: usize,
    total_points: usize,
    /// Earliest time the next step may run.
    next_due: f64,
    needs_clear: bool,
}

impl Replay {
    #[must_use]
    pub fn new(data: SignatureData) -> Self {
        let total_points = data.point_count();
        Self {
            data,
            options: ReplayOptions::default(),
            state: State::Stopped,
            stroke_index: 0,
            point_index: 0,
            completed_points: 0,
            total_points,
            next_due: 0.0,
            needs_clear: true,
        }
    }

    /// Start playing from the current position. No-op while already playing.
    pub fn play(&mut self, options: ReplayOptions, now_ms: f64) {
        if self.state == State::Playing {
            return;
        }
        self.options = options;
        self.state = State::Playing;
        self.next_due = now_ms;
        log::debug!("replay: play ({} points, speed {})", self.total_points, options.speed);
    }

    pub fn pause(&mut self) {
        if self.state == State::Playing {
            self.state = State::Paused;
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if self.state == State::Paused {
            self.state = State::Playing;
            self.next_due = now_ms;
        }
    }

    /// Halt playback, keeping the current position.
    pub fn stop(&mut self) {
        self.state = State::Stopped;
    }

    /// Halt playback and rewind to the first point.
    pub fn reset(&mut self) {
        self.stop();
        self.rewind();
    }

    /// Completed points over total points, `0.0` for an empty signature.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.total_points == 0 {
            return 0.0;
        }
        self.completed_points as f64 / self.total_points as f64
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == State::Playing
    }

    #[must_use]
    pub fn data(&self) -> &SignatureData {
        &self.data
    }

    /// Advance playback by at most one point.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects a drawing call.
    pub fn on_frame<S: Surface>(&mut self, surface: &mut S, now_ms: f64) -> Result<ReplayStatus, SurfaceError> {
        match self.state {
            State::Stopped => return Ok(ReplayStatus::Idle),
            State::Paused => return Ok(ReplayStatus::Paused),
            State::Playing => {}
        }

        if self.needs_clear {
            let (w, h) = surface.size();
            clear(surface, w, h);
            self.needs_clear = false;
        }

        if now_ms < self.next_due {
            return Ok(ReplayStatus::Playing);
        }

        let Some(stroke) = self.data.strokes.get(self.stroke_index) else {
            return Ok(self.finish(now_ms));
        };

        if self.point_index < stroke.points.len() {
            if self.point_index > 0 {
                let from = &stroke.points[self.point_index - 1];
                let to = &stroke.points[self.point_index];
                surface.save();
                surface.set_stroke_color(&stroke.color);
                surface.set_line_width((stroke.min_width + stroke.max_width) / 2.0);
                surface.set_line_cap(LineCap::Round);
                surface.set_line_join(LineJoin::Round);
                surface.begin_path();
                surface.move_to(from.x, from.y);
                surface.line_to(to.x, to.y);
                surface.stroke();
                surface.restore();
            }
            self.point_index += 1;
            self.completed_points += 1;
        } else {
            self.stroke_index += 1;
            self.point_index = 0;
        }

        self.next_due = now_ms + self.options.interval();
        Ok(ReplayStatus::Playing)
    }

    fn finish(&mut self, now_ms: f64) -> ReplayStatus {
        if self.options.looped {
            self.rewind();
            self.next_due = now_ms + LOOP_DELAY_MS;
            ReplayStatus::Looping
        } else {
            self.state = State::Stopped;
            log::debug!("replay: completed");
            ReplayStatus::Completed
        }
    }

    fn rewind(&mut self) {
        self.stroke_index = 0;
        self.point_index = 0;
        self.completed_points = 0;
        self.needs_clear = true;
    }
}
