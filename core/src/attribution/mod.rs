//! Owner attribution: which player controls each non-player damage source.

mod resolver;


pub use resolver::{
    Attribution, AttributionEntry, OwnershipResolver, ResolutionStats, SkipCounts, SkipReason,
    admit, resolve_ownership,
};
