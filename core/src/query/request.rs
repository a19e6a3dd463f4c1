use crate::combat_log::OWNERSHIP_FIELDS;

/// Damage-causing event types the ownership query asks for.
pub const DAMAGE_EVENT_TYPES: [&str; 5] = [
    "SWING_DAMAGE",
    "SWING_DAMAGE_LANDED",
    "SPELL_DAMAGE",
    "SPELL_PERIODIC_DAMAGE",
    "RANGE_DAMAGE",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabularFormat {
    /// Comma separated with a header row.
    #[default]
    Csv,
}

impl TabularFormat {
    pub fn as_arg(&self) -> &'static str {
        match self {
            TabularFormat::Csv => "csv",
        }
    }
}

/// A structured query against the combat log engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Log source handed to the engine, usually a file path.
    pub input: String,
    pub event_types: Vec<String>,
    /// Projected columns, in response order.
    pub fields: Vec<String>,
    pub limit: usize,
    pub format: TabularFormat,
}

impl QueryRequest {
    /// The fixed damage query used for owner attribution.
    pub fn ownership(input: impl Into<String>, limit: usize) -> Self {
        Self {
            input: input.into(),
            event_types: DAMAGE_EVENT_TYPES.iter().map(|s| s.to_string()).collect(),
            fields: OWNERSHIP_FIELDS.iter().map(|s| s.to_string()).collect(),
            limit,
            format: TabularFormat::Csv,
        }
    }

    /// Arguments for the engine's `events search` command.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "events".to_string(),
            "search".to_string(),
            "--input".to_string(),
            self.input.clone(),
            "--event-types".to_string(),
            self.event_types.join(","),
            "--limit".to_string(),
            self.limit.to_string(),
            "--fields".to_string(),
            self.fields.join(","),
            "--format".to_string(),
            self.format.as_arg().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_query_shape() {
        let request = QueryRequest::ownership("raid.log", 500_000);

        assert_eq!(request.event_types.len(), 5);
        assert!(request.event_types.iter().any(|t| t == "SWING_DAMAGE_LANDED"));
        assert_eq!(
            request.fields,
            vec![
                "source",
                "sourceGUID",
                "sourceOwner",
                "sourceOwnerGUID",
                "sourceAttributed"
            ]
        );
        assert_eq!(request.format, TabularFormat::Csv);
    }

    #[test]
    fn engine_arguments() {
        let args = QueryRequest::ownership("logs/WoWCombatLog.txt", 25).to_args();
        assert_eq!(
            args,
            vec![
                "events",
                "search",
                "--input",
                "logs/WoWCombatLog.txt",
                "--event-types",
                "SWING_DAMAGE,SWING_DAMAGE_LANDED,SPELL_DAMAGE,SPELL_PERIODIC_DAMAGE,RANGE_DAMAGE",
                "--limit",
                "25",
                "--fields",
                "source,sourceGUID,sourceOwner,sourceOwnerGUID,sourceAttributed",
                "--format",
                "csv",
            ]
        );
    }
}
