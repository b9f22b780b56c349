// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

//! Persistence core.
//!
//! [`SessionStore`] holds the authoritative in-memory collection, writes every
//! change through a [`BackingStore`] before notifying subscribers, and runs the
//! schema migration pipeline on cold start.

pub mod backing;
pub mod clock;
pub mod session_store;

pub use backing::{
    BackingError, BackingStore, FileBacking, MemoryBacking, NoopBacking, WriteDurability,
};
pub use clock::{Clock, SystemClock};
pub use session_store::{SessionStore, Subscription, ENVELOPE_VERSION, STORAGE_FILE_NAME};
