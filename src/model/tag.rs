// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

use super::catalog::{ActionCode, MistakeType, Side};
use super::ids::TagId;

/// One timestamped annotation event within a session.
///
/// `id` and `created_at` are fixed at creation; everything else is mutable
/// through [`TagPatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    id: TagId,
    timestamp: f64,
    created_at: u64,
    comment: String,
    side: Option<Side>,
    action: Option<ActionCode>,
    mistake: Option<MistakeType>,
}

impl Tag {
    pub fn new(id: TagId, created_at: u64, draft: TagDraft) -> Self {
        Self {
            id,
            timestamp: draft.timestamp,
            created_at,
            comment: draft.comment,
            side: draft.side,
            action: draft.action,
            mistake: draft.mistake,
        }
    }

    pub fn id(&self) -> &TagId {
        &self.id
    }

    /// Seconds into the video. Not validated against the video duration.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Wall-clock millis at creation.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn action(&self) -> Option<&ActionCode> {
        self.action.as_ref()
    }

    pub fn mistake(&self) -> Option<MistakeType> {
        self.mistake
    }

    /// Merges the patch field by field. `id` and `created_at` are not part of
    /// the patch and can never change.
    pub fn apply(&mut self, patch: &TagPatch) {
        if let Some(comment) = &patch.comment {
            self.comment = comment.clone();
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
        if let Some(side) = patch.side {
            self.side = side;
        }
        if let Some(action) = &patch.action {
            self.action = action.clone();
        }
        if let Some(mistake) = patch.mistake {
            self.mistake = mistake;
        }
    }
}

/// The caller-supplied part of a new tag; the store assigns id and creation
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDraft {
    pub comment: String,
    pub timestamp: f64,
    pub side: Option<Side>,
    pub action: Option<ActionCode>,
    pub mistake: Option<MistakeType>,
}

impl TagDraft {
    pub fn new(comment: impl Into<String>, timestamp: f64) -> Self {
        Self {
            comment: comment.into(),
            timestamp,
            side: None,
            action: None,
            mistake: None,
        }
    }
}

/// A partial tag update. `None` leaves the field alone; for the optional
/// classification fields the inner option distinguishes "set" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagPatch {
    pub comment: Option<String>,
    pub timestamp: Option<f64>,
    pub side: Option<Option<Side>>,
    pub action: Option<Option<ActionCode>>,
    pub mistake: Option<Option<MistakeType>>,
}
