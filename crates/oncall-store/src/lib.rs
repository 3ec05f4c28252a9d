//! In-memory conversation store.
//!
//! Holds per-session dialogue state and message history behind one mutex,
//! so read-modify-write cycles for a conversation id are serialized. The
//! store is injected into the router rather than living as global state,
//! which keeps it swappable for an external store later.

pub mod store;

pub use store::{ConversationStore, StoreError, StoreLimits};
