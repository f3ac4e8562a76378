//! trivia-store: Persistence for lifetime stats, quiz history, custom
//! questions, and the user profile.
//!
//! Values are JSON documents under six fixed keys in a string-keyed
//! [`KvBackend`]. Reads fail soft: a missing or unreadable value is treated
//! as absent.

pub mod backend;
pub mod error;
pub mod keys;
pub mod store;

pub use backend::{FileBackend, KvBackend, MemoryBackend};
pub use error::StoreError;
pub use keys::Namespace;
pub use store::{Snapshot, TriviaStore, HISTORY_LIMIT};
