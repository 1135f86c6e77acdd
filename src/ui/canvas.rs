// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video viewport with comment overlays.
//!
//! Frames are not decoded, so the viewport shows the project thumbnail (or
//! a placeholder) scaled to 16:9 and draws the active comments over it.

use kozy::io::media::VideoSource;
use kozy::models::comment::Comment;
use kozy::util::time::format_time;

const ASPECT: f32 = 16.0 / 9.0;

/// What the viewport draws this frame.
pub struct Viewport<'a> {
    pub title: &'a str,
    pub thumbnail: Option<&'a egui::TextureHandle>,
    pub source: &'a VideoSource,
    pub overlays: &'a [&'a Comment],
    pub position: f64,
}

/// Display the viewport. Clicking it toggles playback.
pub fn show(ui: &mut egui::Ui, viewport: &Viewport) -> bool {
    let available = ui.available_size();
    let (width, height) = if available.x / available.y.max(1.0) > ASPECT {
        (available.y * ASPECT, available.y)
    } else {
        (available.x, available.x / ASPECT)
    };

    let x_offset = (available.x - width) / 2.0;
    let rect = egui::Rect::from_min_size(
        ui.min_rect().min + egui::vec2(x_offset, 0.0),
        egui::vec2(width, height),
    );
    let response = ui.allocate_rect(rect, egui::Sense::click());
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 8.0, egui::Color32::BLACK);

    match viewport.thumbnail {
        Some(texture) => {
            painter.image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::from_gray(160),
            );
        }
        None => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                viewport.title,
                egui::FontId::proportional(28.0),
                egui::Color32::from_gray(90),
            );
        }
    }

    let source_label = match viewport.source {
        VideoSource::Cached { size, .. } => {
            format!("cached locally ({:.1} MB)", *size as f64 / (1024.0 * 1024.0))
        }
        VideoSource::Url(url) => url.clone(),
    };
    painter.text(
        rect.left_top() + egui::vec2(12.0, 10.0),
        egui::Align2::LEFT_TOP,
        source_label,
        egui::FontId::proportional(11.0),
        egui::Color32::from_gray(140),
    );

    painter.text(
        rect.right_top() + egui::vec2(-12.0, 10.0),
        egui::Align2::RIGHT_TOP,
        format_time(viewport.position),
        egui::FontId::monospace(16.0),
        egui::Color32::WHITE,
    );

    draw_overlays(&painter, viewport.overlays, &rect);

    response.clicked()
}

/// Order in which overlays are stacked upward from the bottom edge. The
/// latest comment sits lowest, so the stack reads top-down in timeline order.
fn bottom_up<'a>(overlays: &'a [&'a Comment]) -> impl Iterator<Item = &'a Comment> {
    overlays.iter().rev().copied()
}

/// Stack active comments from the bottom of the frame, latest lowest.
fn draw_overlays(painter: &egui::Painter, overlays: &[&Comment], rect: &egui::Rect) {
    let line_height: f32 = 30.0;
    let mut y = rect.max.y - 16.0;

    for comment in bottom_up(overlays) {
        let [r, g, b] = comment.category.rgb();
        let text = format!(
            "{}  {}: {}",
            comment.category.label(),
            comment.author,
            comment.text
        );
        let galley = painter.layout_no_wrap(
            text,
            egui::FontId::proportional(15.0),
            egui::Color32::WHITE,
        );

        let size = galley.size() + egui::vec2(20.0, 10.0);
        let badge = egui::Rect::from_min_size(
            egui::pos2(rect.center().x - size.x / 2.0, y - size.y),
            size,
        );
        painter.rect_filled(badge, 10.0, egui::Color32::from_black_alpha(190));
        painter.rect_stroke(
            badge,
            10.0,
            egui::Stroke::new(2.0, egui::Color32::from_rgb(r, g, b)),
        );
        painter.galley(badge.min + egui::vec2(10.0, 5.0), galley, egui::Color32::WHITE);

        y -= line_height.max(size.y + 6.0);
        if y < rect.min.y + line_height {
            break;
        }
    }
}
