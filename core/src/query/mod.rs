//! Query module for the external combat log engine.
//!
//! The engine is a collaborator: it filters, projects and serializes combat
//! log rows. This module shapes the one request ownership attribution needs,
//! runs it, and decodes the tabular reply.

mod engine;
mod error;
mod ingest;
mod request;

pub use engine::{CapturedEngine, ProcessEngine, QueryEngine, QueryResponse};
pub use error::{GENERIC_FAILURE_CODE, QueryError};
pub use ingest::{Ingested, ingest_damage_events};
pub use request::{DAMAGE_EVENT_TYPES, QueryRequest, TabularFormat};
