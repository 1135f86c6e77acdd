// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video timeline scrubber control.
//!
//! A horizontal track with the playhead and one marker per comment, colored
//! by category. Clicking or dragging anywhere on the track seeks.

use kozy::models::{comment::Comment, comment_store::CommentStore};

const TRACK_HEIGHT: f32 = 28.0;

/// Result of timeline interaction.
pub enum TimelineAction {
    None,
    Seek(f64),
}

/// Display the timeline and handle scrubbing.
pub fn show(
    ui: &mut egui::Ui,
    comments: &CommentStore,
    position: f64,
    duration: f64,
    window: f64,
) -> TimelineAction {
    let mut action = TimelineAction::None;
    let width = ui.available_width();
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(width, TRACK_HEIGHT), egui::Sense::click_and_drag());

    let duration = if duration > 0.0 { duration } else { 1.0 };
    let x_for = |t: f64| rect.min.x + (t / duration).clamp(0.0, 1.0) as f32 * rect.width();

    if response.clicked() || response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            let fraction = ((pos.x - rect.min.x) / rect.width()).clamp(0.0, 1.0);
            action = TimelineAction::Seek(fraction as f64 * duration);
        }
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::from_gray(35));

    // Elapsed part of the track
    let played = egui::Rect::from_min_max(rect.min, egui::pos2(x_for(position), rect.max.y));
    painter.rect_filled(played, 4.0, egui::Color32::from_rgb(55, 48, 120));

    for comment in comments {
        draw_marker(&painter, comment, &rect, &x_for, window);
    }

    // Playhead
    let x = x_for(position);
    painter.line_segment(
        [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
        egui::Stroke::new(2.0, egui::Color32::WHITE),
    );

    action
}

/// Draw one comment marker; its width spans the overlay window.
fn draw_marker(
    painter: &egui::Painter,
    comment: &Comment,
    rect: &egui::Rect,
    x_for: &dyn Fn(f64) -> f32,
    window: f64,
) {
    let [r, g, b] = comment.category.rgb();
    let alpha = if comment.resolved { 60 } else { 220 };
    let color = egui::Color32::from_rgba_unmultiplied(r, g, b, alpha);

    let start = x_for(comment.timestamp);
    let end = x_for(comment.timestamp + window).max(start + 3.0);
    let marker = egui::Rect::from_min_max(
        egui::pos2(start, rect.min.y + 6.0),
        egui::pos2(end, rect.max.y - 6.0),
    );
    painter.rect_filled(marker, 2.0, color);
}
