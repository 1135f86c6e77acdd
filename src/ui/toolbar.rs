// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transport toolbar.
//!
//! Play/pause, the current position, and the editing commands that act on
//! the whole project (undo, redo, export).

use kozy::util::time::{format_time, parse_time};

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    TogglePlay,
    SkipBack,
    SkipForward,
    Undo,
    Redo,
    Export,
    /// The reviewer corrected the video length, in seconds.
    SetDuration(f64),
}

/// State the toolbar needs to draw itself.
pub struct TransportState {
    pub playing: bool,
    pub position: f64,
    pub duration: f64,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Display the transport toolbar.
pub fn show(ui: &mut egui::Ui, state: &TransportState) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("⏪ 5s").clicked() {
            action = ToolbarAction::SkipBack;
        }

        let play_label = if state.playing { "⏸ Pause" } else { "▶ Play" };
        if ui.button(play_label).clicked() {
            action = ToolbarAction::TogglePlay;
        }

        if ui.button("5s ⏩").clicked() {
            action = ToolbarAction::SkipForward;
        }

        ui.separator();

        ui.label(egui::RichText::new(format_time(state.position)).monospace());
        ui.label("/");
        let mut duration = state.duration;
        let response = ui
            .add(
                egui::DragValue::new(&mut duration)
                    .speed(1.0)
                    .custom_formatter(|v, _| format_time(v))
                    .custom_parser(parse_time),
            )
            .on_hover_text("Video length (drag or type M:SS)");
        if response.changed() && duration >= 1.0 && duration != state.duration {
            action = ToolbarAction::SetDuration(duration);
        }

        ui.separator();

        if ui
            .add_enabled(state.can_undo, egui::Button::new("↶ Undo"))
            .clicked()
        {
            action = ToolbarAction::Undo;
        }
        if ui
            .add_enabled(state.can_redo, egui::Button::new("↷ Redo"))
            .clicked()
        {
            action = ToolbarAction::Redo;
        }

        ui.separator();

        if ui.button("Export review...").clicked() {
            action = ToolbarAction::Export;
        }
    });

    action
}
