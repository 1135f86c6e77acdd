// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the project library and the persistence
//! collaborators, drives the playback clock every frame, and turns UI
//! actions into comment mutations followed by an explicit save.

use kozy::config::Settings;
use kozy::io::{
    blob_store::BlobStore,
    media::{self, VideoSource},
    project_store::ProjectRepository,
    serialization,
};
use kozy::models::{
    comment_store::{CommentFilter, CommentStore},
    project::{Library, Project},
    session::Session,
};
use kozy::playback::{
    overlay::OverlayEngine,
    player::{PlaybackClock, Player},
};
use crate::ui::{canvas, dashboard, properties, timeline, toolbar};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

const SKIP_SECONDS: f64 = 5.0;

/// History system for undo/redo of comment edits.
struct History {
    /// Undo stack (past states)
    undo_stack: Vec<CommentStore>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<CommentStore>,
    /// Maximum history size
    max_size: usize,
}

impl History {
    fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Save the state from before a change
    fn push(&mut self, comments: CommentStore) {
        self.undo_stack.push(comments);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // A new edit invalidates everything that was undone
        self.redo_stack.clear();
    }

    /// Undo: restore previous state
    fn undo(&mut self, current: CommentStore) -> Option<CommentStore> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Redo: restore next state
    fn redo(&mut self, current: CommentStore) -> Option<CommentStore> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

/// Review state of the open project.
struct Editor {
    project_id: String,
    clock: PlaybackClock,
    overlay: OverlayEngine,
    history: History,
    draft: properties::Draft,
    filter: CommentFilter,
    source: VideoSource,
    /// Playback was paused because the reviewer started typing.
    paused_for_comment: bool,
}

impl Editor {
    fn toggle_play(&mut self) {
        if self.clock.is_playing() {
            self.clock.pause();
        } else {
            self.clock.play();
        }
        self.paused_for_comment = false;
    }

    fn seek(&mut self, time: f64) {
        self.clock.seek(time);
        self.overlay.update_position(self.clock.position());
    }
}

/// Main application state.
pub struct KozyApp {
    settings: Settings,
    repository: Box<dyn ProjectRepository>,
    blobs: Arc<dyn BlobStore + Send + Sync>,
    library: Library,

    /// Reviewer for this run, asked for at startup
    session: Option<Session>,
    name_input: String,

    /// Open project, if any
    editor: Option<Editor>,

    new_project: dashboard::NewProjectForm,

    /// Project awaiting delete confirmation
    pending_delete: Option<String>,

    thumbnails: HashMap<String, egui::TextureHandle>,
    failed_thumbnails: HashSet<String>,

    /// Receiver for background video import
    importer: Option<Receiver<Result<Project, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last warning shown in the status bar
    status: Option<String>,
}

impl KozyApp {
    /// Create the application, loading every stored project.
    pub fn new(
        settings: Settings,
        repository: Box<dyn ProjectRepository>,
        blobs: Arc<dyn BlobStore + Send + Sync>,
    ) -> Self {
        let mut status = None;
        let projects = repository.load_all().unwrap_or_else(|e| {
            log::error!("Failed to load projects: {:#}", e);
            status = Some(format!("Could not load projects: {}", e));
            Vec::new()
        });

        Self {
            settings,
            repository,
            blobs,
            library: Library::new(projects),
            session: None,
            name_input: String::new(),
            editor: None,
            new_project: dashboard::NewProjectForm::default(),
            pending_delete: None,
            thumbnails: HashMap::new(),
            failed_thumbnails: HashSet::new(),
            importer: None,
            loading_message: None,
            status,
        }
    }

    /// Write the library out. Failures are reported, memory stays authoritative.
    fn persist(&mut self) {
        match self.repository.save_all(self.library.projects()) {
            Ok(()) => self.status = None,
            Err(e) => {
                log::warn!("Failed to save projects: {:#}", e);
                self.status = Some(format!("Changes not saved: {}", e));
            }
        }
    }

    /// Apply `edit` to the open project's comments; when it reports a change,
    /// record the previous state for undo and persist.
    fn edit_comments(&mut self, edit: impl FnOnce(&mut CommentStore) -> bool) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let Some(project) = self.library.get_mut(&editor.project_id) else {
            return;
        };

        let before = project.comments.clone();
        if edit(&mut project.comments) {
            editor.history.push(before);
            self.persist();
        }
    }

    fn submit_comment(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let Some(editor) = self.editor.as_mut() else {
            return;
        };

        let position = editor.clock.position();
        let text = std::mem::take(&mut editor.draft.text);
        let category = editor.draft.category;
        let priority = editor.draft.priority;
        let resume = std::mem::replace(&mut editor.paused_for_comment, false);

        let mut rejected = None;
        self.edit_comments(|comments| {
            match comments.add(position, &text, &session, category, priority) {
                Ok(_) => true,
                Err(e) => {
                    rejected = Some(e);
                    false
                }
            }
        });

        if let Some(editor) = self.editor.as_mut() {
            if let Some(e) = rejected {
                self.status = Some(e.to_string());
                editor.draft.text = text;
            } else if resume {
                editor.clock.play();
            }
        }
    }

    fn undo(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let Some(project) = self.library.get_mut(&editor.project_id) else {
            return;
        };
        if let Some(previous) = editor.history.undo(project.comments.clone()) {
            project.comments = previous;
            log::info!("Undo");
            self.persist();
        }
    }

    fn redo(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let Some(project) = self.library.get_mut(&editor.project_id) else {
            return;
        };
        if let Some(next) = editor.history.redo(project.comments.clone()) {
            project.comments = next;
            log::info!("Redo");
            self.persist();
        }
    }

    fn open_project(&mut self, id: &str) {
        let Some(project) = self.library.get(id) else {
            return;
        };

        let duration = project.playback_duration(
            self.settings.default_duration_secs,
            self.settings.overlay_window_secs,
        );
        let source = media::resolve_video_source(project, self.blobs.as_ref());
        log::info!("Opened project {:?} ({:?})", project.title, source);

        self.editor = Some(Editor {
            project_id: project.id.clone(),
            clock: PlaybackClock::new(duration),
            overlay: OverlayEngine::new(self.settings.overlay_window_secs),
            history: History::new(self.settings.history_limit),
            draft: properties::Draft::default(),
            filter: CommentFilter::default(),
            source,
            paused_for_comment: false,
        });
    }

    /// Store a corrected video length for the open project.
    fn set_duration(&mut self, seconds: f64) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let Some(project) = self.library.get_mut(&editor.project_id) else {
            return;
        };

        project.duration = Some(seconds);
        editor.clock.set_duration(project.playback_duration(
            self.settings.default_duration_secs,
            editor.overlay.window(),
        ));
        editor.overlay.update_position(editor.clock.position());
        log::info!("Set length of {:?} to {:.1}s", project.title, seconds);
        self.persist();
    }

    fn delete_project(&mut self, id: &str) {
        let Some(project) = self.library.remove(id) else {
            return;
        };

        if let Some(key) = &project.video_blob_key {
            if let Err(e) = self.blobs.delete(key) {
                log::warn!("Failed to delete cached video {}: {:#}", key, e);
            }
        }
        self.thumbnails.remove(id);
        if self.editor.as_ref().is_some_and(|e| e.project_id == id) {
            self.editor = None;
        }
        self.persist();
    }

    /// Create the project described by the form. Local videos are copied
    /// into the blob store on a background thread.
    fn create_project(&mut self) {
        let form = std::mem::take(&mut self.new_project);
        let title = form.title.trim().to_string();
        let duration = form.duration_secs();
        let thumbnail = form
            .thumbnail_path
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let Some(video_path) = form.video_path else {
            let project = Project::new(title, form.video_url.trim().to_string(), thumbnail)
                .with_duration(duration);
            let id = self.library.create(project);
            self.persist();
            self.open_project(&id);
            return;
        };

        let (sender, receiver) = channel();
        self.importer = Some(receiver);
        self.loading_message = Some("Importing video...".to_string());

        let blobs = Arc::clone(&self.blobs);
        std::thread::spawn(move || {
            let result = media::import_video(&video_path, blobs.as_ref())
                .map(|key| {
                    let url = format!("file://{}", video_path.display());
                    Project::new(title, url, thumbnail)
                        .with_video_blob(key)
                        .with_duration(duration)
                })
                .map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
    }

    fn poll_importer(&mut self) {
        let Some(receiver) = &self.importer else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };

        self.importer = None;
        self.loading_message = None;
        match result {
            Ok(project) => {
                let id = self.library.create(project);
                self.persist();
                self.open_project(&id);
            }
            Err(e) => {
                log::error!("Failed to import video: {}", e);
                self.status = Some(format!("Import failed: {}", e));
            }
        }
    }

    fn import_review(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Reviews", &["yaml", "yml", "json"])
            .pick_file()
        else {
            return;
        };

        match serialization::import_project(&path) {
            Ok(project) => {
                log::info!(
                    "Imported {} comments from {}",
                    project.comments.len(),
                    path.display()
                );
                self.library.upsert(project);
                self.persist();
            }
            Err(e) => {
                log::error!("Failed to import review: {:#}", e);
                self.status = Some(format!("Import failed: {}", e));
            }
        }
    }

    fn export_review(&mut self) {
        let Some(project) = self
            .editor
            .as_ref()
            .and_then(|e| self.library.get(&e.project_id))
        else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("YAML", &["yaml", "yml"])
            .add_filter("JSON", &["json"])
            .set_file_name(format!("{}.yaml", project.title))
            .save_file()
        else {
            return;
        };

        match serialization::export_project(project, &path) {
            Ok(()) => log::info!("Exported review to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export review: {:#}", e);
                self.status = Some(format!("Export failed: {}", e));
            }
        }
    }

    /// Decode thumbnails for projects that reference a local image.
    fn load_thumbnails(&mut self, ctx: &egui::Context) {
        for project in self.library.projects() {
            if self.thumbnails.contains_key(&project.id)
                || self.failed_thumbnails.contains(&project.id)
            {
                continue;
            }
            let Some(path) = local_path(&project.thumbnail_url) else {
                self.failed_thumbnails.insert(project.id.clone());
                continue;
            };

            match media::load_image(&path) {
                Ok(img) => {
                    let size = [img.width as usize, img.height as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &img.pixels);
                    let texture = ctx.load_texture(
                        format!("thumb-{}", project.id),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    self.thumbnails.insert(project.id.clone(), texture);
                }
                Err(e) => {
                    log::warn!("Failed to load thumbnail {}: {:#}", path.display(), e);
                    self.failed_thumbnails.insert(project.id.clone());
                }
            }
        }
    }

    fn show_name_prompt(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |_ui| {});

        egui::Window::new("Who is reviewing?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Your name is shown next to every comment you add.");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.name_input).hint_text("Your name..."),
                );
                response.request_focus();

                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let ready = !self.name_input.trim().is_empty();
                if (ui.add_enabled(ready, egui::Button::new("Start reviewing")).clicked()
                    || submitted)
                    && ready
                {
                    match Session::new(&self.name_input) {
                        Ok(session) => {
                            log::info!("Reviewing as {}", session.display_name());
                            self.session = Some(session);
                        }
                        Err(e) => self.status = Some(e.to_string()),
                    }
                }
            });
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        self.load_thumbnails(ctx);

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    show_loading(ui, message);
                    dashboard::DashboardAction::None
                } else {
                    dashboard::show(ui, &self.library, &self.thumbnails)
                }
            })
            .inner;

        match action {
            dashboard::DashboardAction::Open(id) => self.open_project(&id),
            dashboard::DashboardAction::Delete(id) => self.pending_delete = Some(id),
            dashboard::DashboardAction::NewProject => self.new_project.open = true,
            dashboard::DashboardAction::ImportReview => self.import_review(),
            dashboard::DashboardAction::None => {}
        }

        if self.new_project.open {
            match dashboard::show_new_project_form(ctx, &mut self.new_project) {
                dashboard::FormAction::Submit => self.create_project(),
                dashboard::FormAction::Cancel => self.new_project.reset(),
                dashboard::FormAction::None => {}
            }
        }

        self.show_delete_confirmation(ctx);
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(id) = self.pending_delete.clone() else {
            return;
        };
        let title = self
            .library
            .get(&id)
            .map(|p| p.title.clone())
            .unwrap_or_default();

        let mut decision = None;
        egui::Window::new("Delete project?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "\"{}\" and all of its comments will be deleted.",
                    title
                ));
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        decision = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                });
            });

        match decision {
            Some(true) => {
                self.pending_delete = None;
                self.delete_project(&id);
            }
            Some(false) => self.pending_delete = None,
            None => {}
        }
    }

    fn show_editor(&mut self, ctx: &egui::Context) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let Some(project) = self.library.get(&editor.project_id) else {
            return;
        };

        // Advance the clock and recompute overlays for this frame
        let dt = ctx.input(|i| i.stable_dt) as f64;
        editor.clock.tick(dt);
        editor.overlay.update_position(editor.clock.position());
        if editor.clock.is_playing() {
            ctx.request_repaint();
        }

        let transport = toolbar::TransportState {
            playing: editor.clock.is_playing(),
            position: editor.clock.position(),
            duration: editor.clock.duration(),
            can_undo: editor.history.can_undo(),
            can_redo: editor.history.can_redo(),
        };
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &transport))
            .inner;

        let position = editor.clock.position();
        let properties_action = egui::SidePanel::right("comments")
            .default_width(340.0)
            .show(ctx, |ui| {
                properties::show(
                    ui,
                    &project.comments,
                    &mut editor.draft,
                    &mut editor.filter,
                    position,
                )
            })
            .inner;

        let timeline_action = egui::TopBottomPanel::bottom("timeline")
            .show(ctx, |ui| {
                ui.add_space(6.0);
                let action = timeline::show(
                    ui,
                    &project.comments,
                    position,
                    editor.clock.duration(),
                    editor.overlay.window(),
                );
                ui.add_space(6.0);
                action
            })
            .inner;

        let overlays = editor.overlay.active(&project.comments);
        let viewport = canvas::Viewport {
            title: &project.title,
            thumbnail: self.thumbnails.get(&project.id),
            source: &editor.source,
            overlays: &overlays,
            position,
        };
        let viewport_clicked = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, &viewport))
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::TogglePlay => editor.toggle_play(),
            toolbar::ToolbarAction::SkipBack => editor.seek(position - SKIP_SECONDS),
            toolbar::ToolbarAction::SkipForward => editor.seek(position + SKIP_SECONDS),
            toolbar::ToolbarAction::Undo => self.undo(),
            toolbar::ToolbarAction::Redo => self.redo(),
            toolbar::ToolbarAction::Export => self.export_review(),
            toolbar::ToolbarAction::SetDuration(seconds) => self.set_duration(seconds),
            toolbar::ToolbarAction::None => {}
        }

        if viewport_clicked {
            if let Some(editor) = self.editor.as_mut() {
                editor.toggle_play();
            }
        }

        if let timeline::TimelineAction::Seek(time) = timeline_action {
            if let Some(editor) = self.editor.as_mut() {
                editor.seek(time);
            }
        }

        match properties_action {
            properties::PropertiesAction::StartComposing => {
                if let Some(editor) = self.editor.as_mut() {
                    if editor.clock.is_playing() {
                        editor.clock.pause();
                        editor.paused_for_comment = true;
                    }
                }
            }
            properties::PropertiesAction::Submit => self.submit_comment(),
            properties::PropertiesAction::JumpTo(time) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.overlay.seek_to(&mut editor.clock, time);
                    editor.overlay.update_position(editor.clock.position());
                    editor.paused_for_comment = false;
                }
            }
            properties::PropertiesAction::ToggleResolved(id) => {
                self.edit_comments(|comments| comments.toggle_resolved(&id).is_some());
            }
            properties::PropertiesAction::Delete(id) => {
                self.edit_comments(|comments| comments.remove(&id));
            }
            properties::PropertiesAction::None => {}
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.editor.is_none() || ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            if let Some(editor) = self.editor.as_mut() {
                editor.toggle_play();
            }
        }

        // Undo (Ctrl+Z)
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift) {
            self.undo();
        }

        // Redo (Ctrl+Shift+Z or Ctrl+Y)
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) {
            self.redo();
        }
    }
}

/// Interpret a thumbnail reference as a local file if it is one.
fn local_path(reference: &str) -> Option<PathBuf> {
    if reference.is_empty() {
        return None;
    }
    let path = Path::new(reference.strip_prefix("file://").unwrap_or(reference));
    path.is_file().then(|| path.to_path_buf())
}

fn show_loading(ui: &mut egui::Ui, message: &str) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.spinner();
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new(message)
                    .size(16.0)
                    .color(egui::Color32::from_gray(200)),
            );
        });
    });
}

impl eframe::App for KozyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_importer();

        // Keep the spinner moving while importing
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Project...").clicked() {
                        self.editor = None;
                        self.new_project.open = true;
                        ui.close_menu();
                    }
                    if ui.button("Import Review...").clicked() {
                        self.import_review();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.editor.is_some(), egui::Button::new("Export Review..."))
                        .clicked()
                    {
                        self.export_review();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(self.editor.is_some(), egui::Button::new("Back to Projects"))
                        .clicked()
                    {
                        self.editor = None;
                        ui.close_menu();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let can_undo = self.editor.as_ref().is_some_and(|e| e.history.can_undo());
                    if ui.add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)")).clicked() {
                        self.undo();
                        ui.close_menu();
                    }
                    let can_redo = self.editor.as_ref().is_some_and(|e| e.history.can_redo());
                    if ui
                        .add_enabled(can_redo, egui::Button::new("Redo (Ctrl+Shift+Z)"))
                        .clicked()
                    {
                        self.redo();
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.session {
                    Some(session) => ui.label(format!("Reviewer: {}", session.display_name())),
                    None => ui.label("Not signed in"),
                };
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(250, 180, 60), status.as_str());
                }
            });
        });

        if self.session.is_none() {
            self.show_name_prompt(ctx);
            return;
        }

        self.handle_shortcuts(ctx);

        if self.editor.is_some() {
            self.show_editor(ctx);
        } else {
            self.show_dashboard(ctx);
        }
    }
}
