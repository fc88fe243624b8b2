//! Client Index subsystem
//!
//! The process-wide, in-memory client store. Owned explicitly and shared
//! by handle (`Arc<ClientIndex>`) between the snapshot loader and the
//! request facade.
//!
//! # Invariants
//!
//! - Primary (id) and secondary (lowercased email) mappings are updated
//!   together under one lock acquisition
//! - A bulk replace is observed as a single step by every reader
//! - Records without an id are never stored
//! - Nothing expires; entries leave only through delete or bulk replace

mod client_index;
mod errors;

pub use client_index::{ClientIndex, ReloadSummary};
pub use errors::{IndexError, IndexResult};
