//! Vector Store
//!
//! Persistent storage for embedded annual-report chunks.
//!
//! ## Layout
//!
//! - **types**: `Chunk`, `ScoredChunk`, embedding (de)serialization
//! - **chunk_store**: SQLite-backed `ChunkStore` with per-company similarity search
//! - **error**: `StoreError`

mod chunk_store;
mod error;
mod types;

pub use chunk_store::{store_exists, ChunkStore, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use types::{
    bytes_to_embedding, chunk_id, cosine_similarity, embedding_to_bytes, Chunk, ScoredChunk,
};
