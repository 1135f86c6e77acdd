// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project dashboard.
//!
//! A grid of project cards showing comment counts and resolution progress,
//! plus the form for creating a new project.

use kozy::models::project::{Library, Project};
use kozy::util::time::parse_time;
use std::collections::HashMap;
use std::path::PathBuf;

const CARD_WIDTH: f32 = 260.0;
const THUMB_HEIGHT: f32 = CARD_WIDTH * 9.0 / 16.0;

/// Result of dashboard interaction.
pub enum DashboardAction {
    None,
    Open(String),
    Delete(String),
    NewProject,
    ImportReview,
}

/// Fields of the "new project" form.
#[derive(Default)]
pub struct NewProjectForm {
    pub open: bool,
    pub title: String,
    pub video_url: String,
    pub video_path: Option<PathBuf>,
    pub thumbnail_path: Option<PathBuf>,
    /// Video length as typed, `M:SS` or seconds. Blank when unknown.
    pub duration: String,
}

impl NewProjectForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The typed video length, if one was given and it parses.
    pub fn duration_secs(&self) -> Option<f64> {
        parse_time(&self.duration).filter(|s| *s > 0.0)
    }

    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && (self.video_path.is_some() || !self.video_url.trim().is_empty())
            && (self.duration.trim().is_empty() || self.duration_secs().is_some())
    }
}

/// Result of the "new project" form.
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

/// Display the project grid.
pub fn show(
    ui: &mut egui::Ui,
    library: &Library,
    thumbnails: &HashMap<String, egui::TextureHandle>,
) -> DashboardAction {
    let mut action = DashboardAction::None;

    ui.horizontal(|ui| {
        ui.heading(format!("Projects ({})", library.len()));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Import review...").clicked() {
                action = DashboardAction::ImportReview;
            }
            if ui.button("➕ New project").clicked() {
                action = DashboardAction::NewProject;
            }
        });
    });
    ui.separator();

    if library.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("No projects yet. Create one to start reviewing.")
                    .color(egui::Color32::from_gray(150)),
            );
        });
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for project in library.projects() {
                if let Some(a) = project_card(ui, project, thumbnails.get(&project.id)) {
                    action = a;
                }
            }
        });
    });

    action
}

fn project_card(
    ui: &mut egui::Ui,
    project: &Project,
    thumbnail: Option<&egui::TextureHandle>,
) -> Option<DashboardAction> {
    let mut action = None;

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(CARD_WIDTH);
        ui.vertical(|ui| {
            let (rect, response) = ui.allocate_exact_size(
                egui::vec2(CARD_WIDTH, THUMB_HEIGHT),
                egui::Sense::click(),
            );
            let painter = ui.painter_at(rect);
            match thumbnail {
                Some(texture) => {
                    painter.image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                None => {
                    painter.rect_filled(rect, 6.0, egui::Color32::from_rgb(49, 46, 129));
                    let initial = project.title.chars().next().unwrap_or('?').to_uppercase();
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        initial.to_string(),
                        egui::FontId::proportional(48.0),
                        egui::Color32::WHITE,
                    );
                }
            }
            if response.on_hover_text("Open project").clicked() {
                action = Some(DashboardAction::Open(project.id.clone()));
            }

            ui.label(egui::RichText::new(&project.title).strong().size(16.0));
            ui.label(
                egui::RichText::new(format!(
                    "{} comments · {}",
                    project.comments.len(),
                    project.created_label()
                ))
                .small()
                .weak(),
            );

            let progress = project.comments.resolution_progress();
            ui.add(
                egui::ProgressBar::new(progress as f32 / 100.0)
                    .desired_width(CARD_WIDTH)
                    .text(format!("{}%", progress)),
            );

            ui.horizontal(|ui| {
                if ui.button("Open").clicked() {
                    action = Some(DashboardAction::Open(project.id.clone()));
                }
                if ui.button("🗑 Delete").clicked() {
                    action = Some(DashboardAction::Delete(project.id.clone()));
                }
            });
        });
    });

    action
}

/// Display the "new project" form as a modal window.
pub fn show_new_project_form(ctx: &egui::Context, form: &mut NewProjectForm) -> FormAction {
    let mut action = FormAction::None;

    egui::Window::new("New project")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Grid::new("new_project_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Title");
                    ui.text_edit_singleline(&mut form.title);
                    ui.end_row();

                    ui.label("Video file");
                    ui.horizontal(|ui| {
                        if ui.button("Choose...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("Videos", kozy::io::media::VIDEO_EXTENSIONS)
                                .pick_file()
                            {
                                form.video_path = Some(path);
                            }
                        }
                        match &form.video_path {
                            Some(path) => ui.label(path.display().to_string()),
                            None => ui.weak("none"),
                        };
                    });
                    ui.end_row();

                    ui.label("or video URL");
                    ui.add_enabled(
                        form.video_path.is_none(),
                        egui::TextEdit::singleline(&mut form.video_url).hint_text("https://..."),
                    );
                    ui.end_row();

                    ui.label("Length");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.duration)
                            .hint_text("M:SS, optional"),
                    );
                    ui.end_row();

                    ui.label("Thumbnail");
                    ui.horizontal(|ui| {
                        if ui.button("Choose...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("Images", kozy::io::media::IMAGE_EXTENSIONS)
                                .pick_file()
                            {
                                form.thumbnail_path = Some(path);
                            }
                        }
                        match &form.thumbnail_path {
                            Some(path) => ui.label(path.display().to_string()),
                            None => ui.weak("optional"),
                        };
                    });
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(form.is_complete(), egui::Button::new("Create"))
                    .clicked()
                {
                    action = FormAction::Submit;
                }
                if ui.button("Cancel").clicked() {
                    action = FormAction::Cancel;
                }
            });
        });

    action
}
