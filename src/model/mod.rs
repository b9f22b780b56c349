// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

//! Core data model.
//!
//! Sessions own their tags; a tag never exists outside the session for the
//! video file it annotates. Classification fields are closed sets.

pub mod catalog;
pub mod ids;
pub mod session;
pub mod tag;

pub use catalog::{
    ActionCode, ActionCodeError, MistakeType, ParseMistakeTypeError, ParseSideError, Side,
    ACTION_CODES,
};
pub use ids::{BoutId, Id, IdError, TagId};
pub use session::{Session, SessionPatch};
pub use tag::{Tag, TagDraft, TagPatch};
