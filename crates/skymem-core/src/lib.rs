// Skymem Core — persistent memory for a Bluesky social assistant.
// Tracks what the assistant knows about users (interests, notes,
// conversation history) and which users care about which topics,
// backed by a single pretty-printed JSON document on disk.

pub mod error;
pub mod store;
pub mod types;

pub use error::{MemoryError, MemoryResult};
pub use store::{MemoryStore, DEFAULT_MEMORY_FILE};
pub use types::{
    ConversationEntry, Interaction, MemoryData, Meta, Note, SearchHit, TopicRecord, UserChange,
    UserRecord, MEMORY_VERSION,
};
