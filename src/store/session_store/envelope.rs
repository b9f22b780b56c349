// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

/// Envelope codec and migration pipeline.
///
/// Shapes accepted on read, tried in this order:
/// 1. the current versioned envelope `{"version": N, "sessions": [...]}`;
/// 2. the pre-versioning legacy shape, a bare array of session records whose
///    tags may carry `text` instead of `comment`.
/// Anything else (including unparseable text) decodes to an empty collection.
/// The order is load-bearing: a versioned payload must never be misread as
/// legacy.
struct DecodedPayload {
    sessions: Vec<Session>,
    /// True when the payload was read through the legacy path and should be
    /// re-persisted in envelope form.
    migrated: bool,
}

impl DecodedPayload {
    fn empty() -> Self {
        Self {
            sessions: Vec::new(),
            migrated: false,
        }
    }
}

fn decode_store_payload(raw: &str) -> DecodedPayload {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return DecodedPayload::empty();
    };

    match value {
        serde_json::Value::Object(map) => {
            let versioned = map
                .get("version")
                .and_then(serde_json::Value::as_u64)
                .is_some();
            let sessions = map.get("sessions").and_then(|v| v.as_array().cloned());
            match (versioned, sessions) {
                (true, Some(items)) => DecodedPayload {
                    sessions: decode_session_records(items),
                    migrated: false,
                },
                _ => DecodedPayload::empty(),
            }
        }
        serde_json::Value::Array(items) => DecodedPayload {
            sessions: decode_session_records(items),
            migrated: true,
        },
        _ => DecodedPayload::empty(),
    }
}

/// Records that fail structural validation are dropped; siblings survive.
fn decode_session_records(items: Vec<serde_json::Value>) -> Vec<Session> {
    items.into_iter().filter_map(session_from_json).collect()
}

fn encode_store_payload(sessions: &[Session]) -> serde_json::Result<String> {
    let envelope = EnvelopeJson {
        version: ENVELOPE_VERSION,
        sessions: sessions.iter().map(session_to_json).collect(),
    };
    serde_json::to_string(&envelope)
}

#[derive(Debug, Clone, Serialize)]
struct EnvelopeJson {
    version: u32,
    sessions: Vec<SessionJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionJson {
    id: String,
    #[serde(rename = "fileName")]
    file_name: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    tags: Vec<TagJson>,
    #[serde(rename = "lastModified", default)]
    last_modified: u64,
    #[serde(
        rename = "leftFencer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    left_fencer: Option<String>,
    #[serde(
        rename = "rightFencer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    right_fencer: Option<String>,
    #[serde(rename = "boutDate", default, skip_serializing_if = "Option::is_none")]
    bout_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TagJson {
    id: String,
    timestamp: f64,
    #[serde(rename = "createdAt", default)]
    created_at: u64,
    #[serde(default)]
    comment: Option<String>,
    /// Legacy field superseded by `comment`; read-only, never written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mistake: Option<String>,
}

/// Decodes a tag array tolerantly: malformed tag records are dropped without
/// failing the surrounding session.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<TagJson>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

fn session_from_json(value: serde_json::Value) -> Option<Session> {
    let json: SessionJson = serde_json::from_value(value).ok()?;
    let id = BoutId::new(json.id).ok()?;

    let mut session = Session::new(id, json.file_name, json.last_modified);
    session.set_left_fencer(json.left_fencer);
    session.set_right_fencer(json.right_fencer);
    session.set_bout_date(json.bout_date);

    for tag_json in json.tags {
        if let Some(tag) = tag_from_json(tag_json) {
            session.tags_mut().push(tag);
        }
    }

    Some(session)
}

fn tag_from_json(json: TagJson) -> Option<Tag> {
    let id = TagId::new(json.id).ok()?;
    if !json.timestamp.is_finite() || json.timestamp < 0.0 {
        return None;
    }

    // `comment` wins over legacy `text` when both are present.
    let comment = json.comment.or(json.text).unwrap_or_default();

    // Out-of-catalogue classification values are repaired to absent rather
    // than dropping the record.
    let side = json
        .side
        .as_deref()
        .and_then(|raw| raw.parse::<crate::model::Side>().ok());
    let action = json
        .action
        .as_deref()
        .and_then(|raw| raw.parse::<crate::model::ActionCode>().ok());
    let mistake = json
        .mistake
        .as_deref()
        .and_then(|raw| raw.parse::<crate::model::MistakeType>().ok());

    let mut draft = TagDraft::new(comment, json.timestamp);
    draft.side = side;
    draft.action = action;
    draft.mistake = mistake;
    Some(Tag::new(id, json.created_at, draft))
}

fn session_to_json(session: &Session) -> SessionJson {
    SessionJson {
        id: session.id().to_string(),
        file_name: session.file_name().to_owned(),
        tags: session.tags().iter().map(tag_to_json).collect(),
        last_modified: session.last_modified(),
        left_fencer: session.left_fencer().map(ToOwned::to_owned),
        right_fencer: session.right_fencer().map(ToOwned::to_owned),
        bout_date: session.bout_date().map(ToOwned::to_owned),
    }
}

fn tag_to_json(tag: &Tag) -> TagJson {
    TagJson {
        id: tag.id().to_string(),
        timestamp: tag.timestamp(),
        created_at: tag.created_at(),
        comment: Some(tag.comment().to_owned()),
        text: None,
        side: tag.side().map(|side| side.as_str().to_owned()),
        action: tag.action().map(|action| action.as_str().to_owned()),
        mistake: tag.mistake().map(|mistake| mistake.as_str().to_owned()),
    }
}
