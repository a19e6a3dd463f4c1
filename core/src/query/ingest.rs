use crate::combat_log::{CombatEvent, decode_events};

use super::{QueryEngine, QueryError, QueryRequest};

/// Decoded damage rows from one ownership query.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    /// Rows in the order the engine returned them.
    pub events: Vec<CombatEvent>,
    /// Row cap the query was issued with.
    pub limit: usize,
}

impl Ingested {
    pub fn rows_fetched(&self) -> usize {
        self.events.len()
    }

    /// The engine may have stopped at the cap, so rows could be missing.
    pub fn possibly_truncated(&self) -> bool {
        self.events.len() >= self.limit
    }
}

/// Issues the ownership query once and decodes the response.
///
/// A non-zero engine status is returned as [`QueryError::EngineFailed`] with
/// the engine's diagnostic text; the payload is not decoded in that case.
pub fn ingest_damage_events<E>(engine: &E, input: &str, limit: usize) -> Result<Ingested, QueryError>
where
    E: QueryEngine + ?Sized,
{
    let request = QueryRequest::ownership(input, limit);
    let response = engine.run(&request)?;

    if !response.is_success() {
        return Err(QueryError::EngineFailed {
            code: response.code,
            diagnostic: response.diagnostic(),
        });
    }

    let events = decode_events(&response.stdout_text())?;
    let ingested = Ingested { events, limit };

    tracing::info!(
        rows = ingested.rows_fetched(),
        limit,
        "Ingested damage events"
    );
    if ingested.possibly_truncated() {
        tracing::warn!(
            rows = ingested.rows_fetched(),
            limit,
            "Row count reached the query limit"
        );
    }

    Ok(ingested)
}
