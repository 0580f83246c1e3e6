// ── Skymem: Error Types ────────────────────────────────────────────────────
// Single canonical error enum for the memory layer, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (I/O, serialization).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • A malformed backing file is NOT an error: the store recovers locally by
//     starting from an empty document (see `MemoryStore::open`). Only real
//     I/O failures (disk full, permission denied) surface here.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All memory operations return this type.
pub type MemoryResult<T> = Result<T, MemoryError>;
