// ── Skymem: Document Types ─────────────────────────────────────────────────
// The shape of the backing JSON document. All mappings are insertion-ordered
// (`IndexMap`) so the file round-trips the way it was written.

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Static version string written into `meta` at first initialization.
/// Not enforced on load.
pub const MEMORY_VERSION: &str = "0.1.0";

/// Current time as an RFC 3339 string, the timestamp format used
/// throughout the document.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

// ── Root document ──────────────────────────────────────────────────────────

/// The whole backing document. Lives in memory for the process lifetime;
/// rewritten to disk in full after every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryData {
    /// Per-user memory, keyed by lowercased handle.
    #[serde(default)]
    pub users: IndexMap<String, UserRecord>,

    /// Present in the document structure since the first version but never
    /// populated by any operation. Kept so existing files round-trip.
    #[serde(default)]
    pub conversations: IndexMap<String, Value>,

    /// Topic-to-user associations, keyed by lowercased topic.
    #[serde(default)]
    pub topics: IndexMap<String, TopicRecord>,

    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Set once when the document is first created.
    pub created_at: String,
    pub version: String,
}

impl Default for Meta {
    fn default() -> Self {
        Meta {
            created_at: now_rfc3339(),
            version: MEMORY_VERSION.to_string(),
        }
    }
}

// ── User records ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub first_seen: String,

    /// Ordered set of lowercase interest strings. Insertion order, no
    /// duplicates.
    #[serde(default)]
    pub interests: Vec<String>,

    /// Append-only notes about the user.
    #[serde(default)]
    pub notes: Vec<Note>,

    /// The most recent interaction, overwritten each time one is recorded.
    #[serde(default)]
    pub last_interaction: Option<Interaction>,

    /// Append-only conversation log. Entries added via `record_interaction`
    /// carry a nested `{type, content}` object as their content; entries
    /// added directly carry whatever value the caller supplied.
    #[serde(default)]
    pub conversation_history: Vec<ConversationEntry>,

    /// Bumped on every `update_user` call. Absent until the first update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,

    /// Any field set verbatim through `UserChange::SetField` that is not one
    /// of the typed fields above.
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, Value>,
}

impl UserRecord {
    /// A fresh record for a user seen for the first time.
    pub fn new() -> Self {
        UserRecord {
            first_seen: now_rfc3339(),
            interests: Vec::new(),
            notes: Vec::new(),
            last_interaction: None,
            conversation_history: Vec::new(),
            last_updated: None,
            extra: IndexMap::new(),
        }
    }
}

impl Default for UserRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// A timestamped note about a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub timestamp: String,
    pub content: String,
}

/// One entry in a user's conversation log. `content` is an arbitrary JSON
/// value, not a flat string — see `conversation_history` on `UserRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub timestamp: String,
    pub content: Value,
}

/// The most recent interaction with a user (post, reply, like, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

// ── Topics ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Handles associated with this topic. Insertion order, no duplicates.
    #[serde(default)]
    pub users: Vec<String>,
}

// ── Updates ────────────────────────────────────────────────────────────────

/// One recognized operation applied by `MemoryStore::update_user`.
#[derive(Debug, Clone)]
pub enum UserChange {
    /// Append to `interests` if non-empty and not already present.
    AddInterest(String),

    /// Append a timestamped note if the content is non-empty.
    AddNote(String),

    /// Unconditionally append a conversation entry. No empty-value guard —
    /// this is the passthrough used by `record_interaction`.
    AddConversation(Value),

    /// Set a field verbatim on the record, overwriting whatever was there.
    SetField(String, Value),
}

// ── Search ─────────────────────────────────────────────────────────────────

/// One `search_users` match: the handle plus a snapshot of the record.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub handle: String,
    pub data: UserRecord,
}
