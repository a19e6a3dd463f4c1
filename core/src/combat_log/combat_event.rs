/// GUID prefix the game uses for player characters.
pub const PLAYER_GUID_PREFIX: &str = "Player-";

/// Columns projected from the query engine, in request order.
pub const SOURCE: &str = "source";
pub const SOURCE_GUID: &str = "sourceGUID";
pub const SOURCE_OWNER: &str = "sourceOwner";
pub const SOURCE_OWNER_GUID: &str = "sourceOwnerGUID";
pub const SOURCE_ATTRIBUTED: &str = "sourceAttributed";

pub const OWNERSHIP_FIELDS: [&str; 5] = [
    SOURCE,
    SOURCE_GUID,
    SOURCE_OWNER,
    SOURCE_OWNER_GUID,
    SOURCE_ATTRIBUTED,
];

/// True when the identifier belongs to a player character rather than a pet,
/// guardian, totem, vehicle or NPC.
pub fn is_player_guid(guid: &str) -> bool {
    guid.starts_with(PLAYER_GUID_PREFIX)
}

/// One damage row as returned by the query engine.
///
/// Values are kept exactly as decoded; trimming happens during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatEvent {
    /// 1-based data row in the tabular response (header excluded).
    pub row: u64,
    pub source: String,
    pub source_guid: String,
    pub source_owner: String,
    pub source_owner_guid: String,
    /// Carried through for downstream consumers, never consulted here.
    pub source_attributed: Option<bool>,
}

impl CombatEvent {
    pub fn new(
        source: impl Into<String>,
        source_guid: impl Into<String>,
        source_owner: impl Into<String>,
        source_owner_guid: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_guid: source_guid.into(),
            source_owner: source_owner.into(),
            source_owner_guid: source_owner_guid.into(),
            ..Default::default()
        }
    }

    pub fn with_row(mut self, row: u64) -> Self {
        self.row = row;
        self
    }
}

/// Reads the `sourceAttributed` cell. Anything other than a boolean literal is
/// treated as absent.
pub fn parse_attributed(cell: &str) -> Option<bool> {
    match cell.trim() {
        "true" | "TRUE" | "True" | "1" => Some(true),
        "false" | "FALSE" | "False" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_prefix_is_case_sensitive() {
        assert!(is_player_guid("Player-1403-071099E1"));
        assert!(!is_player_guid("player-1403-071099E1"));
        assert!(!is_player_guid("Pet-0-3061-2552-1234-165189-0B05A4E8F1"));
        assert!(!is_player_guid("Creature-0-3061-2552-1234-19668-000012AB34"));
        assert!(!is_player_guid(""));
    }

    #[test]
    fn attributed_flag_values() {
        assert_eq!(parse_attributed("true"), Some(true));
        assert_eq!(parse_attributed(" false "), Some(false));
        assert_eq!(parse_attributed(""), None);
        assert_eq!(parse_attributed("undefined"), None);
    }
}
