// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project state management.
//!
//! A project binds one video to its ordered list of review comments. The
//! [`Library`] holds every project known to the application.

use super::comment_store::CommentStore;
use serde::{Deserialize, Serialize};

/// A review session bound to one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    /// Where the video can be fetched from when no cached copy exists.
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub comments: CommentStore,
    /// Key of locally cached video bytes in the blob store.
    #[serde(default, alias = "googleDriveFileId", skip_serializing_if = "Option::is_none")]
    pub video_blob_key: Option<String>,
    /// Video length in seconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Project {
    /// Create a project with no comments.
    pub fn new(title: String, video_url: String, thumbnail_url: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            video_url,
            thumbnail_url,
            created_at: chrono::Utc::now().timestamp_millis(),
            comments: CommentStore::new(),
            video_blob_key: None,
            duration: None,
        }
    }

    /// Attach locally cached video bytes stored under `key`.
    pub fn with_video_blob(mut self, key: String) -> Self {
        self.video_blob_key = Some(key);
        self
    }

    /// Record the video length in seconds. Non-positive or non-finite values
    /// leave the length unknown.
    pub fn with_duration(mut self, seconds: Option<f64>) -> Self {
        self.duration = seconds.filter(|s| s.is_finite() && *s > 0.0);
        self
    }

    /// Length the player should allow. An unknown duration falls back to
    /// `default`, and the result always reaches past the last comment's
    /// overlay so every comment can be jumped to.
    pub fn playback_duration(&self, default: f64, window: f64) -> f64 {
        let last_overlay_end = self
            .comments
            .iter()
            .map(|c| c.timestamp)
            .filter(|t| t.is_finite())
            .fold(0.0, f64::max)
            + window.max(0.0);
        match self.duration {
            Some(duration) => duration.max(last_overlay_end),
            None => default.max(last_overlay_end),
        }
    }

    /// Creation time formatted for display in the local timezone.
    pub fn created_label(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.created_at)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_default()
    }
}

/// Every project, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    projects: Vec<Project>,
}

impl Library {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Add a project in front of the existing ones and return its id.
    pub fn create(&mut self, project: Project) -> String {
        let id = project.id.clone();
        log::info!("Created project {:?} ({})", project.title, id);
        self.projects.insert(0, project);
        id
    }

    /// Insert a project, replacing any stored project with the same id in place.
    pub fn upsert(&mut self, project: Project) {
        match self.get_mut(&project.id) {
            Some(existing) => {
                log::info!("Replaced project {:?} ({})", project.title, project.id);
                *existing = project;
            }
            None => {
                self.create(project);
            }
        }
    }

    /// Remove a project together with its comments. The removed project is
    /// returned so the caller can release its cached video.
    pub fn remove(&mut self, id: &str) -> Option<Project> {
        let index = self.projects.iter().position(|p| p.id == id)?;
        let project = self.projects.remove(index);
        log::info!(
            "Deleted project {:?} with {} comments",
            project.title,
            project.comments.len()
        );
        Some(project)
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comment::{Category, Priority};
    use crate::models::session::Session;

    fn project(title: &str) -> Project {
        Project::new(title.into(), format!("file:///{}.mp4", title), String::new())
    }

    #[test]
    fn test_new_project_has_no_comments() {
        let p = project("trailer");
        assert!(p.comments.is_empty());
        assert!(p.video_blob_key.is_none());
        assert!(!p.id.is_empty());
    }

    #[test]
    fn test_create_prepends() {
        let mut library = Library::default();
        let first = library.create(project("one"));
        let second = library.create(project("two"));

        let ids: Vec<&str> = library.projects().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, [second.as_str(), first.as_str()]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut library = Library::default();
        let first = library.create(project("one"));
        library.create(project("two"));

        let mut edited = library.get(&first).unwrap().clone();
        edited.title = "renamed".into();
        library.upsert(edited);
        assert_eq!(library.len(), 2);
        assert_eq!(library.projects()[1].title, "renamed");

        library.upsert(project("three"));
        assert_eq!(library.len(), 3);
        assert_eq!(library.projects()[0].title, "three");
    }

    #[test]
    fn test_remove_cascades_comments() {
        let mut library = Library::default();
        let id = library.create(project("one").with_video_blob("blob-1".into()));
        let session = Session::new("r").unwrap();
        library
            .get_mut(&id)
            .unwrap()
            .comments
            .add(1.0, "hi", &session, Category::Video, Priority::Low)
            .unwrap();

        let removed = library.remove(&id).unwrap();
        assert_eq!(removed.comments.len(), 1);
        assert_eq!(removed.video_blob_key.as_deref(), Some("blob-1"));
        assert!(library.is_empty());
        assert!(library.remove(&id).is_none());
    }

    #[test]
    fn test_playback_duration_covers_late_comments() {
        let session = Session::new("r").unwrap();
        let mut p = project("feature");
        assert_eq!(p.playback_duration(300.0, 2.5), 300.0);

        p.comments
            .add(400.0, "late cut", &session, Category::Transition, Priority::High)
            .unwrap();
        assert_eq!(p.playback_duration(300.0, 2.5), 402.5);

        let p = p.with_duration(Some(1200.0));
        assert_eq!(p.playback_duration(300.0, 2.5), 1200.0);
    }

    #[test]
    fn test_with_duration_ignores_nonsense() {
        assert_eq!(project("a").with_duration(Some(90.0)).duration, Some(90.0));
        assert_eq!(project("a").with_duration(Some(0.0)).duration, None);
        assert_eq!(project("a").with_duration(Some(f64::NAN)).duration, None);
        assert_eq!(project("a").with_duration(None).duration, None);
    }

    #[test]
    fn test_document_round_trip_field_names() {
        let json = r#"{
            "id": "p1",
            "title": "Promo",
            "videoUrl": "blob:abc",
            "thumbnailUrl": "https://example.com/t.jpg",
            "createdAt": 1700000000000,
            "googleDriveFileId": "vid-1",
            "comments": [
                {"id":"c2","timestamp":9,"text":"late","user":"a","createdAt":2,"category":"bug","priority":"high"},
                {"id":"c1","timestamp":1,"text":"early","user":"a","createdAt":1,"category":"music","priority":"low","resolved":true}
            ]
        }"#;
        let p: Project = serde_json::from_str(json).unwrap();
        assert_eq!(p.video_blob_key.as_deref(), Some("vid-1"));
        assert_eq!(p.comments.as_slice()[0].id, "c1");

        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["videoBlobKey"], "vid-1");
        assert!(value["comments"].is_array());
        assert!(value.get("duration").is_none());
    }
}
