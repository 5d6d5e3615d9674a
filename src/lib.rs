// In: src/lib.rs

//! Pokemon Team Analyzer
//!
//! Parses Smogon-format team text into structured data and produces an
//! explainable team analysis report — type coverage, metagame threats, and
//! prioritized recommendations — from a static species/move dataset plus
//! per-format usage statistics.

// --- MODULE DECLARATIONS ---
pub mod analysis;
pub mod errors;
pub mod mcp_interface;
pub mod parser;
pub mod providers;

// --- PUBLIC API RE-EXPORTS ---
// The most important types, importable straight from the crate root.

// --- From the `schema` crate ---
pub use schema::{
    // Supporting types & enums
    BaseStats,
    Lookup,
    MatchupRecord,
    // Core data structs
    Member,
    MoveCategory,
    MoveProfile,
    Nature,
    // Core enums
    PokemonType,
    Roster,
    SpeciesProfile,
    StatName,
    TeammateUsage,
    UsageProfile,
};

// --- From this crate's modules (`src/`) ---

// The analysis pipeline and its result types.
pub use analysis::{AnalyzerConfig, TeamAnalyzer, TeamReport};
pub use analysis::{CoverageMatrix, DataCompleteness, Insight, SpeedTier, StrategyFinding, Threat};

// Parsing.
pub use parser::parse_team;

// Provider boundary and bundled implementations.
pub use providers::{DexData, PokedexProvider, ResponseCache, UsageProvider, UsageSnapshot};

// Crate-specific error and result types.
pub use errors::{
    AnalysisResult, AnalyzerError, DatasetError, DatasetResult, ParseError, ParseResult,
    RosterError,
};
