// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Time-ordered comment collection.
//!
//! A project's comments are kept sorted by timestamp at all times. Every
//! mutation happens in memory only and reports whether it changed anything,
//! so the caller decides when to persist.

use super::comment::{Category, Comment, Priority};
use super::session::Session;
use crate::error::ReviewError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Criteria for narrowing the comment list. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

impl CommentFilter {
    /// Build a filter from UI/CLI strings where `"all"` means no constraint.
    pub fn parse(category: &str, priority: &str) -> Result<Self, String> {
        Ok(Self {
            category: parse_criterion(category)?,
            priority: parse_criterion(priority)?,
        })
    }

    pub fn matches(&self, comment: &Comment) -> bool {
        self.category.map_or(true, |c| comment.category == c)
            && self.priority.map_or(true, |p| comment.priority == p)
    }

    pub fn is_all(&self) -> bool {
        self.category.is_none() && self.priority.is_none()
    }
}

fn parse_criterion<T: FromStr<Err = String>>(value: &str) -> Result<Option<T>, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

/// The comments of one project, ordered by non-decreasing timestamp.
///
/// Equal timestamps keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Comment>", into = "Vec<Comment>")]
pub struct CommentStore {
    comments: Vec<Comment>,
}

impl From<Vec<Comment>> for CommentStore {
    /// Loaded documents may have been edited by hand, so the ordering is
    /// re-established here.
    fn from(mut comments: Vec<Comment>) -> Self {
        for comment in &mut comments {
            comment.timestamp = clamp_timestamp(comment.timestamp);
        }
        comments.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self { comments }
    }
}

impl From<CommentStore> for Vec<Comment> {
    fn from(store: CommentStore) -> Self {
        store.comments
    }
}

/// Negative and NaN positions mean "start of video".
fn clamp_timestamp(timestamp: f64) -> f64 {
    if timestamp.is_nan() || timestamp < 0.0 {
        0.0
    } else {
        timestamp
    }
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment by `session`'s reviewer at `timestamp`.
    ///
    /// The comment lands after every existing comment whose timestamp is
    /// less than or equal to its own.
    pub fn add(
        &mut self,
        timestamp: f64,
        text: &str,
        session: &Session,
        category: Category,
        priority: Priority,
    ) -> Result<&Comment, ReviewError> {
        if text.trim().is_empty() {
            return Err(ReviewError::EmptyCommentText);
        }

        let timestamp = clamp_timestamp(timestamp);
        let comment = Comment::new(
            timestamp,
            text.to_string(),
            session.display_name().to_string(),
            category,
            priority,
        );

        let index = self.comments.partition_point(|c| c.timestamp <= timestamp);
        self.comments.insert(index, comment);
        log::info!(
            "Added {} comment at {:.2}s, total: {}",
            category,
            timestamp,
            self.comments.len()
        );
        Ok(&self.comments[index])
    }

    /// Delete the comment with `id`. Returns false if there was none.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.comments.remove(index);
                log::info!("Removed comment {}, total: {}", id, self.comments.len());
                true
            }
            None => false,
        }
    }

    /// Set the resolved flag. Returns false if the id is unknown or the flag
    /// already had that value.
    pub fn set_resolved(&mut self, id: &str, resolved: bool) -> bool {
        match self.comments.iter_mut().find(|c| c.id == id) {
            Some(comment) if comment.resolved != resolved => {
                comment.resolved = resolved;
                log::info!("Comment {} resolved: {}", id, resolved);
                true
            }
            _ => false,
        }
    }

    /// Flip the resolved flag, returning the new value.
    pub fn toggle_resolved(&mut self, id: &str) -> Option<bool> {
        let resolved = !self.get(id)?.resolved;
        self.set_resolved(id, resolved);
        Some(resolved)
    }

    /// Comments matching `filter`, in timeline order.
    pub fn filter(&self, filter: &CommentFilter) -> Vec<&Comment> {
        self.comments.iter().filter(|c| filter.matches(c)).collect()
    }

    /// Percentage of resolved comments, rounded half up. Zero when empty.
    pub fn resolution_progress(&self) -> u8 {
        let total = self.comments.len();
        if total == 0 {
            return 0;
        }
        // floor(100 * resolved / total + 1/2) without going through floats
        let percent = (200 * self.resolved_count() + total) / (2 * total);
        percent as u8
    }

    pub fn resolved_count(&self) -> usize {
        self.comments.iter().filter(|c| c.resolved).count()
    }

    /// Number of comments per category, for filter badges.
    pub fn counts_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for comment in &self.comments {
            *counts.entry(comment.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn get(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.comments.iter()
    }

    pub fn as_slice(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.comments.iter().position(|c| c.id == id)
    }
}

impl<'a> IntoIterator for &'a CommentStore {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("tester").unwrap()
    }

    fn add(store: &mut CommentStore, t: f64, text: &str) -> String {
        store
            .add(t, text, &session(), Category::Video, Priority::Medium)
            .unwrap()
            .id
            .clone()
    }

    fn is_sorted(store: &CommentStore) -> bool {
        store
            .as_slice()
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }

    #[test]
    fn test_add_keeps_timestamp_order() {
        let mut store = CommentStore::new();
        for t in [5.0, 1.0, 9.5, 0.0, 3.3, 9.5, 2.0, 100.0, 0.5] {
            add(&mut store, t, "note");
            assert!(is_sorted(&store));
        }
        assert_eq!(store.len(), 9);
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let mut store = CommentStore::new();
        add(&mut store, 2.0, "first");
        add(&mut store, 1.0, "before");
        add(&mut store, 2.0, "second");
        add(&mut store, 2.0, "third");

        let texts: Vec<&str> = store.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["before", "first", "second", "third"]);
    }

    #[test]
    fn test_add_records_session_author_and_defaults() {
        let mut store = CommentStore::new();
        let comment = store
            .add(3.0, "too loud", &session(), Category::Sound, Priority::High)
            .unwrap();
        assert_eq!(comment.author, "tester");
        assert_eq!(comment.category, Category::Sound);
        assert_eq!(comment.priority, Priority::High);
        assert!(!comment.resolved);
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut store = CommentStore::new();
        let result = store.add(1.0, "  \n\t", &session(), Category::Bug, Priority::Low);
        assert_eq!(result.unwrap_err(), ReviewError::EmptyCommentText);
        assert!(store.is_empty());
    }

    #[test]
    fn test_negative_timestamp_clamped_to_zero() {
        let mut store = CommentStore::new();
        add(&mut store, 1.0, "later");
        add(&mut store, -4.0, "start");
        assert_eq!(store.as_slice()[0].timestamp, 0.0);
        assert_eq!(store.as_slice()[0].text, "start");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = CommentStore::new();
        let keep = add(&mut store, 1.0, "keep");
        let gone = add(&mut store, 2.0, "gone");

        assert!(store.remove(&gone));
        let after_first = store.clone();
        assert!(!store.remove(&gone));
        assert_eq!(store, after_first);
        assert!(store.get(&keep).is_some());
    }

    #[test]
    fn test_set_resolved_round_trip_changes_nothing_else() {
        let mut store = CommentStore::new();
        let id = add(&mut store, 4.0, "color grade");
        let before = store.get(&id).unwrap().clone();

        assert!(store.set_resolved(&id, true));
        assert!(store.get(&id).unwrap().resolved);
        assert!(store.set_resolved(&id, false));
        assert_eq!(store.get(&id).unwrap(), &before);
    }

    #[test]
    fn test_set_resolved_unknown_id_is_noop() {
        let mut store = CommentStore::new();
        add(&mut store, 1.0, "a");
        let before = store.clone();
        assert!(!store.set_resolved("missing", true));
        assert_eq!(store, before);
    }

    #[test]
    fn test_toggle_resolved() {
        let mut store = CommentStore::new();
        let id = add(&mut store, 1.0, "a");
        assert_eq!(store.toggle_resolved(&id), Some(true));
        assert_eq!(store.toggle_resolved(&id), Some(false));
        assert_eq!(store.toggle_resolved("missing"), None);
    }

    #[test]
    fn test_resolution_progress() {
        let mut store = CommentStore::new();
        assert_eq!(store.resolution_progress(), 0);

        let ids: Vec<String> = (0..3).map(|i| add(&mut store, i as f64, "x")).collect();
        store.set_resolved(&ids[0], true);
        assert_eq!(store.resolution_progress(), 33);

        let fourth = add(&mut store, 9.0, "x");
        store.set_resolved(&fourth, true);
        assert_eq!(store.resolution_progress(), 50);

        store.set_resolved(&ids[1], true);
        store.set_resolved(&ids[2], true);
        assert_eq!(store.resolution_progress(), 100);
    }

    #[test]
    fn test_resolution_progress_rounds_half_up() {
        // 1 of 8 is 12.5%
        let mut store = CommentStore::new();
        let ids: Vec<String> = (0..8).map(|i| add(&mut store, i as f64, "x")).collect();
        store.set_resolved(&ids[3], true);
        assert_eq!(store.resolution_progress(), 13);

        // 2 of 3 is 66.67%
        let mut store = CommentStore::new();
        let ids: Vec<String> = (0..3).map(|i| add(&mut store, i as f64, "x")).collect();
        store.set_resolved(&ids[0], true);
        store.set_resolved(&ids[1], true);
        assert_eq!(store.resolution_progress(), 67);
    }

    #[test]
    fn test_filter_composition() {
        let mut store = CommentStore::new();
        let s = session();
        store.add(5.0, "crash", &s, Category::Bug, Priority::High).unwrap();
        store.add(1.0, "typo", &s, Category::Subtitles, Priority::High).unwrap();
        store.add(3.0, "glitch", &s, Category::Bug, Priority::Low).unwrap();
        store.add(7.0, "freeze", &s, Category::Bug, Priority::High).unwrap();

        let filter = CommentFilter::parse("bug", "high").unwrap();
        let texts: Vec<&str> = store.filter(&filter).into_iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["crash", "freeze"]);

        let all = CommentFilter::parse("all", "all").unwrap();
        assert!(all.is_all());
        let everything: Vec<Comment> = store.filter(&all).into_iter().cloned().collect();
        assert_eq!(everything.as_slice(), store.as_slice());
    }

    #[test]
    fn test_filter_rejects_unknown_values() {
        assert!(CommentFilter::parse("bugs", "all").is_err());
        assert!(CommentFilter::parse("all", "urgent").is_err());
    }

    #[test]
    fn test_counts_by_category() {
        let mut store = CommentStore::new();
        let s = session();
        store.add(1.0, "a", &s, Category::Bug, Priority::High).unwrap();
        store.add(2.0, "b", &s, Category::Bug, Priority::Low).unwrap();
        store.add(3.0, "c", &s, Category::Music, Priority::Low).unwrap();

        let counts = store.counts_by_category();
        assert_eq!(counts.get(&Category::Bug), Some(&2));
        assert_eq!(counts.get(&Category::Music), Some(&1));
        assert_eq!(counts.get(&Category::Video), None);
    }

    #[test]
    fn test_deserialize_restores_order() {
        let json = r#"[
            {"id":"b","timestamp":8.0,"text":"b","author":"x","createdAt":2,"category":"music"},
            {"id":"a","timestamp":2.0,"text":"a","author":"x","createdAt":1,"category":"video","resolved":true}
        ]"#;
        let store: CommentStore = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = store.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(store.resolution_progress(), 50);
    }
}
