// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Comment overlays shown on top of the video.
//!
//! A comment is on screen from its timestamp until `window` seconds later,
//! unless it has been resolved. The set is recomputed from scratch on every
//! position update, so seeking in or out of a window takes effect at once.

use super::player::Player;
use crate::models::{comment::Comment, comment_store::CommentStore};

/// How long a comment stays on screen, in seconds.
pub const DEFAULT_WINDOW: f64 = 2.5;

/// Whether `comment` is displayed when the playhead is at `time`.
pub fn is_active(comment: &Comment, time: f64, window: f64) -> bool {
    !comment.resolved && time >= comment.timestamp && time <= comment.timestamp + window
}

/// Tracks the playhead and answers which comments are on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEngine {
    window: f64,
    position: f64,
}

impl Default for OverlayEngine {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl OverlayEngine {
    pub fn new(window: f64) -> Self {
        Self {
            window: window.max(0.0),
            position: 0.0,
        }
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Record the position reported by the player. Negative values count as 0.
    pub fn update_position(&mut self, time: f64) {
        self.position = if time > 0.0 { time } else { 0.0 };
    }

    /// Comments on screen at the current position, in timeline order.
    pub fn active<'a>(&self, comments: &'a CommentStore) -> Vec<&'a Comment> {
        comments
            .iter()
            .filter(|c| is_active(c, self.position, self.window))
            .collect()
    }

    /// Jump the player to `time` and resume playback.
    pub fn seek_to(&self, player: &mut dyn Player, time: f64) {
        log::debug!("Seeking to {:.2}s", time);
        player.seek(time);
        player.play();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::{Category, Priority};
    use crate::models::project::Project;
    use crate::models::session::Session;
    use crate::playback::player::PlaybackClock;

    fn store_with(timestamps: &[f64]) -> CommentStore {
        let session = Session::new("r").unwrap();
        let mut store = CommentStore::new();
        for (i, t) in timestamps.iter().enumerate() {
            store
                .add(*t, &format!("c{}", i), &session, Category::Video, Priority::Medium)
                .unwrap();
        }
        store
    }

    fn active_at(engine: &mut OverlayEngine, store: &CommentStore, t: f64) -> usize {
        engine.update_position(t);
        engine.active(store).len()
    }

    #[test]
    fn test_window_bounds() {
        let mut store = store_with(&[10.0]);
        let mut engine = OverlayEngine::default();

        assert_eq!(active_at(&mut engine, &store, 10.0), 1);
        assert_eq!(active_at(&mut engine, &store, 12.5), 1);
        assert_eq!(active_at(&mut engine, &store, 12.6), 0);
        assert_eq!(active_at(&mut engine, &store, 9.9), 0);

        let id = store.iter().next().unwrap().id.clone();
        store.set_resolved(&id, true);
        for t in [10.0, 11.0, 12.5] {
            assert_eq!(active_at(&mut engine, &store, t), 0);
        }
    }

    #[test]
    fn test_backward_seek_hides_immediately() {
        let store = store_with(&[5.0]);
        let mut engine = OverlayEngine::default();
        assert_eq!(active_at(&mut engine, &store, 6.0), 1);
        assert_eq!(active_at(&mut engine, &store, 1.0), 0);
        assert_eq!(active_at(&mut engine, &store, 7.4), 1);
    }

    #[test]
    fn test_overlapping_overlays_keep_timeline_order() {
        let store = store_with(&[4.0, 3.0, 5.0, 20.0]);
        let mut engine = OverlayEngine::default();
        engine.update_position(5.2);

        let timestamps: Vec<f64> = engine.active(&store).iter().map(|c| c.timestamp).collect();
        assert_eq!(timestamps, [3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_negative_position_clamped() {
        let store = store_with(&[0.0]);
        let mut engine = OverlayEngine::default();
        engine.update_position(-1.0);
        assert_eq!(engine.position(), 0.0);
        assert_eq!(engine.active(&store).len(), 1);
    }

    #[test]
    fn test_custom_window() {
        let store = store_with(&[10.0]);
        let mut engine = OverlayEngine::new(5.0);
        assert_eq!(active_at(&mut engine, &store, 14.9), 1);
        assert_eq!(active_at(&mut engine, &store, 15.1), 0);
    }

    #[test]
    fn test_seek_to_moves_player_and_resumes() {
        let engine = OverlayEngine::default();
        let mut clock = PlaybackClock::new(60.0);
        engine.seek_to(&mut clock, 42.0);
        assert_eq!(clock.position(), 42.0);
        assert!(clock.is_playing());
    }

    #[test]
    fn test_jump_to_comment_past_default_length() {
        let mut project = Project::new("Feature".into(), "https://cdn/f.mp4".into(), String::new());
        project.comments = store_with(&[400.0]);
        let mut engine = OverlayEngine::default();
        let mut clock = PlaybackClock::new(project.playback_duration(300.0, engine.window()));

        engine.seek_to(&mut clock, 400.0);
        engine.update_position(clock.position());
        assert_eq!(clock.position(), 400.0);
        assert!(clock.is_playing());
        assert_eq!(engine.active(&project.comments).len(), 1);
    }

    #[test]
    fn test_jump_to_comment_at_exact_end() {
        let store = store_with(&[60.0]);
        let mut engine = OverlayEngine::default();
        let mut clock = PlaybackClock::new(60.0);

        engine.seek_to(&mut clock, 60.0);
        engine.update_position(clock.position());
        assert_eq!(clock.position(), 60.0);
        assert_eq!(engine.active(&store).len(), 1);
    }
}
