// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::model::{BoutId, Session, SessionPatch, Tag, TagDraft, TagId, TagPatch};
use crate::store::backing::{BackingStore, FileBacking, NoopBacking};
use crate::store::clock::{Clock, SystemClock};

/// Version of the persisted envelope this build writes.
pub const ENVELOPE_VERSION: u32 = 1;

/// Conventional file name for the storage slot; one slot per store.
pub const STORAGE_FILE_NAME: &str = "fencing-tags-sessions.json";

type ListenerFn = dyn Fn() + Send + Sync;

struct StoreInner {
    snapshot: Arc<Vec<Session>>,
    listeners: Vec<(u64, Arc<ListenerFn>)>,
    next_subscription_id: u64,
}

/// Token returned by [`SessionStore::subscribe`]; pass it back to
/// [`SessionStore::unsubscribe`] to deregister.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
}

/// The authoritative in-memory session collection.
///
/// Every mutation is a read-modify-write over the whole collection under one
/// lock: the snapshot is replaced wholesale, the new value is written through
/// the backing store, and only then are subscribers notified. A subscriber
/// woken by a notification therefore always re-reads a snapshot that has
/// already been durably written. Previously returned snapshots are shared
/// `Arc`s and never mutated in place.
///
/// Missing-entity mutations (unknown file name or tag id) are silent no-ops,
/// not errors; the file name key is user/file-driven and naturally racy.
pub struct SessionStore {
    backing: Box<dyn BackingStore>,
    clock: Box<dyn Clock>,
    inner: Mutex<StoreInner>,
}

impl SessionStore {
    /// Builds a store over the given backing and clock, running the migration
    /// pipeline against whatever the backing currently holds. A corrupt or
    /// unrecognized payload yields an empty collection, never an error.
    pub fn new(backing: Box<dyn BackingStore>, clock: Box<dyn Clock>) -> Self {
        let decoded = match backing.load() {
            Some(raw) => decode_store_payload(&raw),
            None => DecodedPayload::empty(),
        };

        // Re-persist upgraded legacy payloads right away so migration is a
        // one-time cost per stored payload.
        if decoded.migrated {
            if let Ok(text) = encode_store_payload(&decoded.sessions) {
                backing.save(&text);
            }
        }

        Self {
            backing,
            clock,
            inner: Mutex::new(StoreInner {
                snapshot: Arc::new(decoded.sessions),
                listeners: Vec::new(),
                next_subscription_id: 0,
            }),
        }
    }

    /// File-backed store under `dir`, slot [`STORAGE_FILE_NAME`], system clock.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let backing = FileBacking::new(dir.as_ref().join(STORAGE_FILE_NAME));
        Self::new(Box::new(backing), Box::new(SystemClock))
    }

    /// Memory-only store: nothing is persisted, everything else works.
    pub fn in_memory() -> Self {
        Self::new(Box::new(NoopBacking), Box::new(SystemClock))
    }

    /// The current snapshot. The returned value is immutable and stays valid
    /// and unchanged across later mutations.
    pub fn list_sessions(&self) -> Arc<Vec<Session>> {
        self.lock().snapshot.clone()
    }

    /// Pure lookup by file name, no side effect. First match wins when
    /// duplicate file names exist.
    pub fn get_session(&self, file_name: &str) -> Option<Session> {
        self.lock()
            .snapshot
            .iter()
            .find(|session| session.file_name() == file_name)
            .cloned()
    }

    /// Returns the session for `file_name`, synthesizing and persisting an
    /// empty one if none exists yet.
    pub fn get_or_create_session(&self, file_name: &str) -> Session {
        let (session, listeners) = {
            let mut inner = self.lock();
            if let Some(existing) = inner
                .snapshot
                .iter()
                .find(|session| session.file_name() == file_name)
            {
                return existing.clone();
            }

            let session = Session::new(BoutId::generate(), file_name, self.clock.now_millis());
            let mut next = (*inner.snapshot).clone();
            next.push(session.clone());
            let listeners = self.commit(&mut inner, next);
            (session, listeners)
        };

        notify(listeners);
        session
    }

    /// Appends a fresh tag to the session for `file_name`, creating the
    /// session if needed, and returns the created tag (with its assigned id).
    pub fn add_tag(&self, file_name: &str, draft: TagDraft) -> Tag {
        let now = self.clock.now_millis();
        let tag = Tag::new(TagId::generate(), now, draft);

        let listeners = {
            let mut inner = self.lock();
            let mut next = (*inner.snapshot).clone();
            match next
                .iter_mut()
                .find(|session| session.file_name() == file_name)
            {
                Some(session) => {
                    session.tags_mut().push(tag.clone());
                    session.set_last_modified(now);
                }
                None => {
                    let mut session = Session::new(BoutId::generate(), file_name, now);
                    session.tags_mut().push(tag.clone());
                    next.push(session);
                }
            }
            self.commit(&mut inner, next)
        };

        notify(listeners);
        tag
    }

    /// Merges `patch` into the tag with `tag_id` inside the session(s) for
    /// `file_name`. Tag id and creation time are immutable. Unknown file name
    /// or tag id leaves the tag collection unchanged.
    pub fn update_tag(&self, file_name: &str, tag_id: &TagId, patch: &TagPatch) {
        let now = self.clock.now_millis();

        let listeners = {
            let mut inner = self.lock();
            let mut next = (*inner.snapshot).clone();
            for session in next
                .iter_mut()
                .filter(|session| session.file_name() == file_name)
            {
                for tag in session.tags_mut().iter_mut() {
                    if tag.id() == tag_id {
                        tag.apply(patch);
                    }
                }
                session.set_last_modified(now);
            }
            self.commit(&mut inner, next)
        };

        notify(listeners);
    }

    /// Removes the tag with `tag_id` from the session(s) for `file_name`.
    pub fn delete_tag(&self, file_name: &str, tag_id: &TagId) {
        let now = self.clock.now_millis();

        let listeners = {
            let mut inner = self.lock();
            let mut next = (*inner.snapshot).clone();
            for session in next
                .iter_mut()
                .filter(|session| session.file_name() == file_name)
            {
                session.tags_mut().retain(|tag| tag.id() != tag_id);
                session.set_last_modified(now);
            }
            self.commit(&mut inner, next)
        };

        notify(listeners);
    }

    /// Removes the session(s) for `file_name` together with all their tags.
    pub fn delete_session(&self, file_name: &str) {
        let listeners = {
            let mut inner = self.lock();
            let mut next = (*inner.snapshot).clone();
            next.retain(|session| session.file_name() != file_name);
            self.commit(&mut inner, next)
        };

        notify(listeners);
    }

    /// Merges bout metadata into the session for `file_name`, creating the
    /// session if it does not exist yet.
    pub fn update_session(&self, file_name: &str, patch: &SessionPatch) {
        let now = self.clock.now_millis();

        let listeners = {
            let mut inner = self.lock();
            let mut next = (*inner.snapshot).clone();
            let exists = next
                .iter()
                .any(|session| session.file_name() == file_name);

            if exists {
                for session in next
                    .iter_mut()
                    .filter(|session| session.file_name() == file_name)
                {
                    session.apply(patch);
                    session.set_last_modified(now);
                }
            } else {
                let mut session = Session::new(BoutId::generate(), file_name, now);
                session.apply(patch);
                next.push(session);
            }
            self.commit(&mut inner, next)
        };

        notify(listeners);
    }

    /// Registers a change listener. Listeners get no payload; they re-read
    /// the latest snapshot themselves. Every successful mutation invokes all
    /// registered listeners after persistence completes.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut inner = self.lock();
        let id = inner.next_subscription_id;
        inner.next_subscription_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        Subscription { id }
    }

    /// Deregisters a listener. Safe to call from within a notified listener;
    /// notification iterates a detached copy of the listener list.
    pub fn unsubscribe(&self, subscription: Subscription) {
        let mut inner = self.lock();
        inner.listeners.retain(|(id, _)| *id != subscription.id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("session store lock poisoned")
    }

    /// Replaces the snapshot and writes it through the backing store while
    /// still holding the lock, so back-to-back mutations persist in order.
    /// Returns the listeners to invoke once the lock is released.
    fn commit(&self, inner: &mut StoreInner, next: Vec<Session>) -> Vec<Arc<ListenerFn>> {
        inner.snapshot = Arc::new(next);
        if let Ok(text) = encode_store_payload(&inner.snapshot) {
            self.backing.save(&text);
        }
        inner
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("SessionStore")
            .field("sessions", &inner.snapshot.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

fn notify(listeners: Vec<Arc<ListenerFn>>) {
    for listener in listeners {
        listener();
    }
}

// Extracted envelope codec and migration pipeline for `SessionStore`.
include!("session_store/envelope.rs");
