use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use serde::Serialize;

use crate::combat_log::{CombatEvent, is_player_guid};

/// One resolved (entity → owning player) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributionEntry {
    pub source: String,
    pub source_guid: String,
    pub owner: String,
    pub owner_guid: String,
}

impl AttributionEntry {
    pub fn key(&self) -> (&str, &str) {
        (&self.source, &self.source_guid)
    }
}

/// First admission rule a row failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Source or owner name is empty.
    EmptyName,
    /// Source and owner carry the same name.
    SelfOwned,
    /// Source is itself a player.
    PlayerSource,
    /// Owner is not a player.
    NonPlayerOwner,
}

/// Checks a row against the admission rules. Identity fields are trimmed
/// before any rule is applied.
pub fn admit(event: &CombatEvent) -> Result<AttributionEntry, SkipReason> {
    let source = event.source.trim();
    let source_guid = event.source_guid.trim();
    let owner = event.source_owner.trim();
    let owner_guid = event.source_owner_guid.trim();

    if source.is_empty() || owner.is_empty() {
        return Err(SkipReason::EmptyName);
    }
    if source == owner {
        return Err(SkipReason::SelfOwned);
    }
    if is_player_guid(source_guid) {
        return Err(SkipReason::PlayerSource);
    }
    if !is_player_guid(owner_guid) {
        return Err(SkipReason::NonPlayerOwner);
    }

    Ok(AttributionEntry {
        source: source.to_string(),
        source_guid: source_guid.to_string(),
        owner: owner.to_string(),
        owner_guid: owner_guid.to_string(),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub empty_name: usize,
    pub self_owned: usize,
    pub player_source: usize,
    pub non_player_owner: usize,
}

impl SkipCounts {
    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::EmptyName => self.empty_name += 1,
            SkipReason::SelfOwned => self.self_owned += 1,
            SkipReason::PlayerSource => self.player_source += 1,
            SkipReason::NonPlayerOwner => self.non_player_owner += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.empty_name + self.self_owned + self.player_source + self.non_player_owner
    }
}

/// Diagnostics gathered during a fold. They never change the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub rows_seen: usize,
    pub skipped: SkipCounts,
    /// Admitted rows whose key was already present.
    pub overwrites: usize,
    /// Overwrites that replaced a different owner.
    pub owner_changes: usize,
}

/// Folds combat rows into an owner table, last observation wins.
///
/// Entries keep the position of their first insertion, so the fold order is
/// stable regardless of how often a key is overwritten.
#[derive(Debug, Default)]
pub struct OwnershipResolver {
    index: HashMap<(String, String), usize>,
    entries: Vec<AttributionEntry>,
    stats: ResolutionStats,
}

impl OwnershipResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: &CombatEvent) {
        self.stats.rows_seen += 1;

        let entry = match admit(event) {
            Ok(entry) => entry,
            Err(reason) => {
                tracing::trace!(row = event.row, ?reason, "Skipping row");
                self.stats.skipped.record(reason);
                return;
            }
        };

        match self
            .index
            .entry((entry.source.clone(), entry.source_guid.clone()))
        {
            Entry::Occupied(slot) => {
                let existing = &mut self.entries[*slot.get()];
                self.stats.overwrites += 1;
                if existing.owner != entry.owner || existing.owner_guid != entry.owner_guid {
                    self.stats.owner_changes += 1;
                    tracing::debug!(
                        row = event.row,
                        source = %entry.source,
                        source_guid = %entry.source_guid,
                        previous_owner = %existing.owner_guid,
                        owner = %entry.owner_guid,
                        "Owner changed"
                    );
                }
                *existing = entry;
            }
            Entry::Vacant(slot) => {
                slot.insert(self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Number of distinct keys so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }

    /// Sorts by source name, case-insensitive. Equal names keep fold order.
    pub fn finish(self) -> Attribution {
        let mut entries = self.entries;
        entries.sort_by_cached_key(|e| e.source.to_lowercase());

        tracing::debug!(
            rows = self.stats.rows_seen,
            skipped = self.stats.skipped.total(),
            entries = entries.len(),
            overwrites = self.stats.overwrites,
            owner_changes = self.stats.owner_changes,
            "Resolved ownership"
        );

        Attribution {
            entries,
            stats: self.stats,
        }
    }
}

/// The final, ordered owner table.
#[derive(Debug, Clone, Default)]
pub struct Attribution {
    entries: Vec<AttributionEntry>,
    stats: ResolutionStats,
}

impl Attribution {
    pub fn entries(&self) -> &[AttributionEntry] {
        &self.entries
    }

    /// Distinct entities mapped.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }

    pub fn owner_of(&self, source: &str, source_guid: &str) -> Option<&AttributionEntry> {
        self.entries.iter().find(|e| e.key() == (source, source_guid))
    }
}

/// Resolves a full row sequence in one pass.
pub fn resolve_ownership<'a, I>(events: I) -> Attribution
where
    I: IntoIterator<Item = &'a CombatEvent>,
{
    let mut resolver = OwnershipResolver::new();
    for event in events {
        resolver.observe(event);
    }
    resolver.finish()
}
