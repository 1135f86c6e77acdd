// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video player abstraction.
//!
//! The review model only needs a handful of transport commands from the
//! player. [`PlaybackClock`] implements them without decoding any frames:
//! the UI loop feeds it elapsed wall-clock time and it reports a position.

/// Transport commands accepted by a video player.
pub trait Player {
    /// Current position in seconds.
    fn position(&self) -> f64;
    fn seek(&mut self, time: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
}

/// A player driven by elapsed time instead of decoded frames.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    position: f64,
    duration: f64,
    playing: bool,
    /// Playback ran to the end on its own. Cleared by any seek.
    ended: bool,
}

impl PlaybackClock {
    pub fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration: duration.max(0.0),
            playing: false,
            ended: false,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Change the length of the video, pulling the position back inside it.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
        if self.position > self.duration {
            self.position = self.duration;
        }
    }

    /// Advance by `dt` seconds if playing. Stops at the end of the video.
    pub fn tick(&mut self, dt: f64) {
        if !self.playing || !(dt > 0.0) {
            return;
        }
        self.position += dt;
        if self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
            self.ended = true;
        }
    }
}

impl Player for PlaybackClock {
    fn position(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, time: f64) {
        self.position = if time.is_nan() {
            0.0
        } else {
            time.clamp(0.0, self.duration)
        };
        self.ended = false;
    }

    fn play(&mut self) {
        // Restart from the top only after running off the end
        if self.ended {
            self.position = 0.0;
            self.ended = false;
        }
        self.playing = self.duration > 0.0;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
