//! Audit store adapters
//!
//! [`InMemoryAuditStore`] for throwaway runs, [`JsonlAuditStore`] for an
//! append-only file that survives restarts.

mod jsonl_store;
mod memory_store;
mod state;

pub use jsonl_store::JsonlAuditStore;
pub use memory_store::InMemoryAuditStore;
pub use state::AuditRecord;
