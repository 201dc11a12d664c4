// src/lib.rs
// Public library surface for the two binaries and integration tests.

pub mod api;
pub mod cli;
pub mod draw;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::draw::DrawRecord;
pub use crate::ingest::types::{SiteSelection, SourceId};
pub use crate::ingest::{Coordinator, Outcome, RunReport};
pub use crate::store::{PersistenceGateway, SqliteStore};
