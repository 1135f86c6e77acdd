// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Comment data structures.
//!
//! This module defines a single review comment together with its
//! category and priority enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What part of the edit a comment is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Video,
    Image,
    Effect,
    Subtitles,
    Transition,
    Music,
    Sound,
    Ai,
    Bug,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Video,
        Category::Image,
        Category::Effect,
        Category::Subtitles,
        Category::Transition,
        Category::Music,
        Category::Sound,
        Category::Ai,
        Category::Bug,
    ];

    /// Identifier used in documents and filter strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Video => "video",
            Category::Image => "image",
            Category::Effect => "effect",
            Category::Subtitles => "subtitles",
            Category::Transition => "transition",
            Category::Music => "music",
            Category::Sound => "sound",
            Category::Ai => "ai",
            Category::Bug => "bug",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Video => "Video",
            Category::Image => "Image",
            Category::Effect => "Effect",
            Category::Subtitles => "Subtitles",
            Category::Transition => "Transition",
            Category::Music => "Music",
            Category::Sound => "Sound",
            Category::Ai => "AI",
            Category::Bug => "Bug",
        }
    }

    /// Badge color as RGB.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Category::Video => [59, 130, 246],
            Category::Image => [16, 185, 129],
            Category::Effect => [168, 85, 247],
            Category::Subtitles => [234, 179, 8],
            Category::Transition => [236, 72, 153],
            Category::Music => [99, 102, 241],
            Category::Sound => [6, 182, 212],
            Category::Ai => [192, 38, 211],
            Category::Bug => [239, 68, 68],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// How urgently a comment needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown priority: {}", s))
    }
}

/// A timestamped review note on a project's video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    /// Seconds from the start of the video.
    pub timestamp: f64,
    pub text: String,
    #[serde(alias = "user")]
    pub author: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub resolved: bool,
}

impl Comment {
    /// Create an unresolved comment with a fresh id, stamped with the current time.
    pub fn new(
        timestamp: f64,
        text: String,
        author: String,
        category: Category,
        priority: Priority,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            text,
            author,
            created_at: chrono::Utc::now().timestamp_millis(),
            category,
            priority,
            resolved: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("BUG".parse::<Category>().unwrap(), Category::Bug);
        assert_eq!(" subtitles ".parse::<Category>().unwrap(), Category::Subtitles);
        assert!("colour".parse::<Category>().is_err());
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
    }

    #[test]
    fn test_new_comment_is_unresolved_with_unique_id() {
        let a = Comment::new(1.0, "a".into(), "dana".into(), Category::Music, Priority::Low);
        let b = Comment::new(1.0, "b".into(), "dana".into(), Category::Music, Priority::Low);
        assert!(!a.resolved);
        assert_ne!(a.id, b.id);
        assert!(a.created_at > 0);
    }

    #[test]
    fn test_deserialize_accepts_user_key_and_missing_fields() {
        let json = r#"{
            "id": "c1",
            "timestamp": 4.2,
            "text": "fix the cut",
            "user": "noa",
            "createdAt": 1700000000000,
            "category": "transition"
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.author, "noa");
        assert_eq!(comment.category, Category::Transition);
        assert_eq!(comment.priority, Priority::Medium);
        assert!(!comment.resolved);
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let comment = Comment::new(0.5, "x".into(), "a".into(), Category::Ai, Priority::High);
        let value = serde_json::to_value(&comment).unwrap();
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["category"], "ai");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["author"], "a");
    }
}
