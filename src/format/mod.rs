// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

//! Export formats.
//!
//! CSV is the only export surface: a deterministic, reconstructable flat view
//! of the whole collection for spreadsheet analysis.

pub mod csv;

pub use csv::{export_csv, export_file_name, format_timestamp, tag_count};
