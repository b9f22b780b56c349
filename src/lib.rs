// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

//! Piste — session store and CSV export for fencing video annotation.
//!
//! The store keeps one in-memory collection of sessions (one per video file
//! name), persists it to a single versioned JSON slot, migrates the
//! pre-versioning on-disk shape forward on load, and flattens the collection
//! into deterministic CSV for export.

pub mod format;
pub mod model;
pub mod store;
