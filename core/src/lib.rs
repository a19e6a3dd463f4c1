pub mod attribution;
pub mod combat_log;
pub mod context;
pub mod query;

// Re-exports for convenience
pub use attribution::{Attribution, AttributionEntry, OwnershipResolver, resolve_ownership};
pub use combat_log::{CombatEvent, is_player_guid};
pub use context::{AppConfig, AppConfigExt, EngineConfig};
pub use query::{
    CapturedEngine, Ingested, ProcessEngine, QueryEngine, QueryError, ingest_damage_events,
};
