// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

use super::ids::BoutId;
use super::tag::Tag;

/// The annotation record for one video file.
///
/// `file_name` is the external lookup key; `id` is the durable bout identity
/// that survives re-selecting a renamed file. Tags stay in insertion order;
/// consumers that want chronological order use [`Session::tags_by_timestamp`].
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: BoutId,
    file_name: String,
    tags: Vec<Tag>,
    last_modified: u64,
    left_fencer: Option<String>,
    right_fencer: Option<String>,
    bout_date: Option<String>,
}

impl Session {
    pub fn new(id: BoutId, file_name: impl Into<String>, last_modified: u64) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            tags: Vec::new(),
            last_modified,
            left_fencer: None,
            right_fencer: None,
            bout_date: None,
        }
    }

    pub fn id(&self) -> &BoutId {
        &self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut Vec<Tag> {
        &mut self.tags
    }

    /// Tags sorted by video timestamp; insertion order inside the session is
    /// left untouched.
    pub fn tags_by_timestamp(&self) -> Vec<&Tag> {
        let mut sorted: Vec<&Tag> = self.tags.iter().collect();
        sorted.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));
        sorted
    }

    /// Wall-clock millis of the last mutation to this session or its tags.
    pub fn last_modified(&self) -> u64 {
        self.last_modified
    }

    pub fn set_last_modified(&mut self, last_modified: u64) {
        self.last_modified = last_modified;
    }

    pub fn left_fencer(&self) -> Option<&str> {
        self.left_fencer.as_deref()
    }

    pub fn set_left_fencer(&mut self, left_fencer: Option<String>) {
        self.left_fencer = left_fencer;
    }

    pub fn right_fencer(&self) -> Option<&str> {
        self.right_fencer.as_deref()
    }

    pub fn set_right_fencer(&mut self, right_fencer: Option<String>) {
        self.right_fencer = right_fencer;
    }

    /// ISO-8601 date string, when known.
    pub fn bout_date(&self) -> Option<&str> {
        self.bout_date.as_deref()
    }

    pub fn set_bout_date(&mut self, bout_date: Option<String>) {
        self.bout_date = bout_date;
    }

    /// Merges the patch field by field; untouched fields keep their value.
    pub fn apply(&mut self, patch: &SessionPatch) {
        if let Some(left_fencer) = &patch.left_fencer {
            self.left_fencer = Some(left_fencer.clone());
        }
        if let Some(right_fencer) = &patch.right_fencer {
            self.right_fencer = Some(right_fencer.clone());
        }
        if let Some(bout_date) = &patch.bout_date {
            self.bout_date = Some(bout_date.clone());
        }
    }
}

/// A partial bout-metadata update; `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub left_fencer: Option<String>,
    pub right_fencer: Option<String>,
    pub bout_date: Option<String>,
}
