// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Comment panel.
//!
//! The composer for new comments, the filter bar, resolution progress and
//! the filtered comment list with jump/resolve/delete controls.

use kozy::models::comment::{Category, Comment, Priority};
use kozy::models::comment_store::{CommentFilter, CommentStore};
use kozy::util::time::format_time;

/// Result of comment panel interaction.
pub enum PropertiesAction {
    None,
    /// The composer gained focus; playback should pause.
    StartComposing,
    Submit,
    JumpTo(f64),
    ToggleResolved(String),
    Delete(String),
}

/// Rows this close to the playhead, in seconds, are highlighted.
const PLAYHEAD_TOLERANCE: f64 = 0.5;

fn near_playhead(comment: &Comment, position: f64) -> bool {
    (position - comment.timestamp).abs() < PLAYHEAD_TOLERANCE
}

/// Text and pickers of the comment being written.
#[derive(Default)]
pub struct Draft {
    pub text: String,
    pub category: Category,
    pub priority: Priority,
}

pub fn category_color(category: Category) -> egui::Color32 {
    let [r, g, b] = category.rgb();
    egui::Color32::from_rgb(r, g, b)
}

/// Display the comment panel.
pub fn show(
    ui: &mut egui::Ui,
    comments: &CommentStore,
    draft: &mut Draft,
    filter: &mut CommentFilter,
    position: f64,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading(format!("Comments ({})", comments.len()));
    ui.add_space(4.0);

    let progress = comments.resolution_progress();
    ui.add(
        egui::ProgressBar::new(progress as f32 / 100.0)
            .text(format!("{}% resolved", progress)),
    );

    ui.separator();

    // Composer
    ui.label(egui::RichText::new(format!("New comment at {}", format_time(position))).strong());
    let editor = ui.add(
        egui::TextEdit::multiline(&mut draft.text)
            .hint_text("What should change here?")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    if editor.gained_focus() {
        action = PropertiesAction::StartComposing;
    }

    ui.horizontal_wrapped(|ui| {
        for category in Category::ALL {
            let selected = draft.category == category;
            let text = egui::RichText::new(category.label()).color(category_color(category));
            if ui.selectable_label(selected, text).clicked() {
                draft.category = category;
            }
        }
    });

    ui.horizontal(|ui| {
        egui::ComboBox::from_id_source("draft_priority")
            .selected_text(draft.priority.as_str())
            .show_ui(ui, |ui| {
                for priority in Priority::ALL {
                    ui.selectable_value(&mut draft.priority, priority, priority.as_str());
                }
            });

        let can_submit = !draft.text.trim().is_empty();
        if ui
            .add_enabled(can_submit, egui::Button::new("Add comment"))
            .clicked()
        {
            action = PropertiesAction::Submit;
        }
    });

    ui.separator();

    // Filter bar
    let counts = comments.counts_by_category();
    ui.horizontal(|ui| {
        egui::ComboBox::from_id_source("filter_category")
            .selected_text(filter.category.map_or("all categories", |c| c.label()))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter.category, None, "all categories");
                for category in Category::ALL {
                    let count = counts.get(&category).copied().unwrap_or(0);
                    ui.selectable_value(
                        &mut filter.category,
                        Some(category),
                        format!("{} ({})", category.label(), count),
                    );
                }
            });

        egui::ComboBox::from_id_source("filter_priority")
            .selected_text(filter.priority.map_or("all priorities", |p| p.as_str()))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut filter.priority, None, "all priorities");
                for priority in Priority::ALL {
                    ui.selectable_value(&mut filter.priority, Some(priority), priority.as_str());
                }
            });
    });

    ui.add_space(4.0);

    let visible = comments.filter(filter);
    if comments.is_empty() {
        ui.label(egui::RichText::new("No comments yet").italics().weak());
    } else if visible.is_empty() {
        ui.label(egui::RichText::new("No comments match the filter").italics().weak());
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for comment in visible {
            if let Some(a) = comment_row(ui, comment, position) {
                action = a;
            }
        }
    });

    action
}

fn comment_row(ui: &mut egui::Ui, comment: &Comment, position: f64) -> Option<PropertiesAction> {
    let mut action = None;

    let mut frame = egui::Frame::group(ui.style());
    if near_playhead(comment, position) {
        frame = frame
            .fill(egui::Color32::from_rgba_unmultiplied(16, 185, 129, 40))
            .stroke(egui::Stroke::new(2.0, egui::Color32::from_rgb(16, 185, 129)));
    }
    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            if ui
                .link(egui::RichText::new(format_time(comment.timestamp)).monospace())
                .on_hover_text("Jump to this moment")
                .clicked()
            {
                action = Some(PropertiesAction::JumpTo(comment.timestamp));
            }
            ui.colored_label(category_color(comment.category), comment.category.label());
            ui.label(egui::RichText::new(comment.priority.as_str()).small().weak());
            ui.label(egui::RichText::new(&comment.author).small());
        });

        let text = egui::RichText::new(&comment.text);
        let text = if comment.resolved {
            text.strikethrough().weak()
        } else {
            text
        };
        ui.label(text);

        ui.horizontal(|ui| {
            let resolve_label = if comment.resolved { "Reopen" } else { "✔ Resolve" };
            if ui.small_button(resolve_label).clicked() {
                action = Some(PropertiesAction::ToggleResolved(comment.id.clone()));
            }
            if ui.small_button("🗑 Delete").clicked() {
                action = Some(PropertiesAction::Delete(comment.id.clone()));
            }
        });
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use kozy::models::session::Session;

    #[test]
    fn test_rows_near_playhead_are_highlighted() {
        let session = Session::new("r").unwrap();
        let mut store = CommentStore::new();
        store
            .add(30.0, "logo pops", &session, Category::Image, Priority::Low)
            .unwrap();
        let comment = &store.as_slice()[0];

        assert!(near_playhead(comment, 30.0));
        assert!(near_playhead(comment, 29.6));
        assert!(near_playhead(comment, 30.4));
        assert!(!near_playhead(comment, 30.5));
        assert!(!near_playhead(comment, 29.0));
    }
}
