// ── Skymem: Memory Store ───────────────────────────────────────────────────
// Owns the in-memory document and mediates every read and write. Each
// mutating call ends with the whole document rewritten to disk; there is no
// partial persistence. Single-threaded by design — if two processes share a
// backing file, the last writer wins.
//
// Known defect, preserved on purpose: a backing file that fails to parse is
// replaced with a fresh empty document and overwritten on the next save,
// without a backup of the old contents.

use crate::error::MemoryResult;
use crate::types::{
    now_rfc3339, ConversationEntry, Interaction, MemoryData, Note, SearchHit, UserChange,
    UserRecord,
};
use log::{info, warn};
use serde_json::{json, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default backing file, relative to the working directory. Overridable only
/// through `MemoryStore::open`.
pub const DEFAULT_MEMORY_FILE: &str = "memory_data.json";

pub struct MemoryStore {
    path: PathBuf,
    data: MemoryData,
}

impl MemoryStore {
    /// Open the store against a backing file.
    ///
    /// Three outcomes: the file is absent → a fresh empty document; it parses
    /// → used as-is; it exists but does not parse → a warning and a fresh
    /// empty document (the old contents are lost on the next save). Read
    /// failures other than not-found propagate.
    pub fn open(path: impl Into<PathBuf>) -> MemoryResult<Self> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    warn!(
                        "[memory] Could not parse {}: {} — starting with empty memory",
                        path.display(),
                        e
                    );
                    MemoryData::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => MemoryData::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(MemoryStore { path, data })
    }

    /// Serialize the whole document to the backing file, overwriting it.
    /// No atomic rename, no backup of the previous version.
    pub fn save(&self) -> MemoryResult<()> {
        let body = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, body)?;
        info!(
            "[memory] Saved {} ({} users, {} topics)",
            self.path.display(),
            self.data.users.len(),
            self.data.topics.len()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only view of the in-memory document.
    pub fn data(&self) -> &MemoryData {
        &self.data
    }

    /// Get the record for a user, creating an empty one on first access.
    /// Lookup is case-insensitive; no "user not found" case exists. Does NOT
    /// persist — only mutating calls write the file.
    pub fn get_user(&mut self, handle: &str) -> &UserRecord {
        self.ensure_user(handle)
    }

    fn ensure_user(&mut self, handle: &str) -> &mut UserRecord {
        let handle = handle.to_lowercase();
        self.data.users.entry(handle).or_default()
    }

    /// Apply a sequence of changes to a user's record, then persist.
    ///
    /// Always bumps `last_updated` and rewrites the file, even for an empty
    /// change list.
    pub fn update_user(&mut self, handle: &str, changes: &[UserChange]) -> MemoryResult<()> {
        let user = self.ensure_user(handle);
        for change in changes {
            match change {
                UserChange::AddInterest(value) => {
                    if !value.is_empty() && !user.interests.contains(value) {
                        user.interests.push(value.clone());
                    }
                }
                UserChange::AddNote(value) => {
                    if !value.is_empty() {
                        user.notes.push(Note {
                            timestamp: now_rfc3339(),
                            content: value.clone(),
                        });
                    }
                }
                UserChange::AddConversation(value) => {
                    user.conversation_history.push(ConversationEntry {
                        timestamp: now_rfc3339(),
                        content: value.clone(),
                    });
                }
                UserChange::SetField(name, value) => set_field(user, name, value),
            }
        }
        user.last_updated = Some(now_rfc3339());
        self.save()
    }

    /// Associate a topic with a user, both ways: the handle joins the
    /// topic's user list and the topic joins the user's interests. Both keys
    /// are lowercased; both sides are deduplicated; one save covers both.
    pub fn add_topic_association(&mut self, topic: &str, handle: &str) -> MemoryResult<()> {
        let topic = topic.to_lowercase();
        let handle = handle.to_lowercase();

        let entry = self.data.topics.entry(topic.clone()).or_default();
        if !entry.users.contains(&handle) {
            entry.users.push(handle.clone());
        }

        let user = self.data.users.entry(handle).or_default();
        if !user.interests.contains(&topic) {
            user.interests.push(topic);
        }

        self.save()
    }

    /// Handles associated with a topic, in insertion order. Unknown topics
    /// yield an empty slice, never an error. Read-only.
    pub fn get_users_by_topic(&self, topic: &str) -> &[String] {
        let topic = topic.to_lowercase();
        self.data
            .topics
            .get(&topic)
            .map(|t| t.users.as_slice())
            .unwrap_or(&[])
    }

    /// Linear substring search over every user: the handle, then interests,
    /// then note contents, case-insensitively; the first hit wins for that
    /// user. Results follow the users map's insertion order. Read-only.
    pub fn search_users(&self, query: &str) -> Vec<SearchHit> {
        let query = query.to_lowercase();
        let mut results = Vec::new();

        for (handle, user) in &self.data.users {
            let matched = handle.contains(&query)
                || user
                    .interests
                    .iter()
                    .any(|interest| interest.to_lowercase().contains(&query))
                || user
                    .notes
                    .iter()
                    .any(|note| note.content.to_lowercase().contains(&query));
            if matched {
                results.push(SearchHit {
                    handle: handle.clone(),
                    data: user.clone(),
                });
            }
        }

        results
    }

    /// Record an interaction (post, reply, like, ...) with a user: overwrite
    /// `last_interaction`, then append a conversation entry whose content is
    /// the nested `{type, content}` object. Persists exactly once, through
    /// the `update_user` call.
    pub fn record_interaction(
        &mut self,
        handle: &str,
        interaction_type: &str,
        content: &str,
    ) -> MemoryResult<()> {
        let user = self.ensure_user(handle);
        user.last_interaction = Some(Interaction {
            timestamp: now_rfc3339(),
            kind: interaction_type.to_string(),
            content: content.to_string(),
        });

        self.update_user(
            handle,
            &[UserChange::AddConversation(json!({
                "type": interaction_type,
                "content": content,
            }))],
        )
    }
}

/// Verbatim field overwrite for `UserChange::SetField`. Typed fields are
/// recognized by name; anything else lands in the record's flattened extras
/// so it serializes alongside the typed fields.
fn set_field(user: &mut UserRecord, name: &str, value: &Value) {
    match name {
        "first_seen" => {
            if let Some(s) = value.as_str() {
                user.first_seen = s.to_string();
            } else {
                warn!("[memory] Ignoring non-string value for first_seen");
            }
        }
        "last_updated" => {
            user.last_updated = value.as_str().map(str::to_string);
        }
        "last_interaction" => {
            user.last_interaction = serde_json::from_value(value.clone()).ok();
        }
        "interests" => match serde_json::from_value(value.clone()) {
            Ok(v) => user.interests = v,
            Err(e) => warn!("[memory] Ignoring malformed interests value: {e}"),
        },
        "notes" => match serde_json::from_value(value.clone()) {
            Ok(v) => user.notes = v,
            Err(e) => warn!("[memory] Ignoring malformed notes value: {e}"),
        },
        "conversation_history" => match serde_json::from_value(value.clone()) {
            Ok(v) => user.conversation_history = v,
            Err(e) => warn!("[memory] Ignoring malformed conversation_history value: {e}"),
        },
        other => {
            user.extra.insert(other.to_string(), value.clone());
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
