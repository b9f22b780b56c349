// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

use crate::model::Session;

const CSV_HEADER: &str = "bout_id,file_name,left_fencer,right_fencer,bout_date,touch_id,\
timestamp,timestamp_formatted,side,action,comment,mistake";

/// Flattens the collection into CSV: one header row plus one row per
/// (session, tag) pair, in session iteration order then tag insertion order.
///
/// Missing optional fields render as empty strings. Fields containing a
/// comma, double quote, or newline are wrapped in double quotes with inner
/// quotes doubled. The exporter does not re-sort; chronological ordering is a
/// presentation concern.
pub fn export_csv(sessions: &[Session]) -> String {
    let mut out = String::from(CSV_HEADER);

    for session in sessions {
        for tag in session.tags() {
            out.push('\n');
            push_field(&mut out, session.id().as_str());
            out.push(',');
            push_field(&mut out, session.file_name());
            out.push(',');
            push_field(&mut out, session.left_fencer().unwrap_or(""));
            out.push(',');
            push_field(&mut out, session.right_fencer().unwrap_or(""));
            out.push(',');
            push_field(&mut out, session.bout_date().unwrap_or(""));
            out.push(',');
            push_field(&mut out, tag.id().as_str());
            out.push(',');
            push_field(&mut out, &tag.timestamp().to_string());
            out.push(',');
            push_field(&mut out, &format_timestamp(tag.timestamp()));
            out.push(',');
            push_field(&mut out, tag.side().map_or("", |side| side.as_str()));
            out.push(',');
            push_field(&mut out, tag.action().map_or("", |action| action.as_str()));
            out.push(',');
            push_field(&mut out, tag.comment());
            out.push(',');
            push_field(
                &mut out,
                tag.mistake().map_or("", |mistake| mistake.as_str()),
            );
        }
    }

    out
}

/// `M:SS` with floored minutes and seconds, zero-padded seconds, and no hour
/// component regardless of magnitude.
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;

    let mut buf = itoa::Buffer::new();
    let mut out = String::with_capacity(8);
    out.push_str(buf.format(mins));
    out.push(':');
    if secs < 10 {
        out.push('0');
    }
    out.push_str(buf.format(secs));
    out
}

/// Suggested name for the downloadable export artifact, dated to the day.
pub fn export_file_name(now_millis: u64) -> String {
    let date = chrono::DateTime::from_timestamp_millis(now_millis as i64)
        .unwrap_or(chrono::DateTime::UNIX_EPOCH);
    format!("fencing-data-{}.csv", date.format("%Y-%m-%d"))
}

/// Total tags across all sessions; one CSV data row per tag.
pub fn tag_count(sessions: &[Session]) -> usize {
    sessions.iter().map(|session| session.tags().len()).sum()
}

fn push_field(out: &mut String, value: &str) {
    if memchr::memchr3(b',', b'"', b'\n', value.as_bytes()).is_none() {
        out.push_str(value);
        return;
    }

    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}
