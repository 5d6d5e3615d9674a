// Poke Analyzer Schema - Shared type definitions
// This crate contains the core enums and data structures shared between the
// analyzer library, the data providers, and the tool-server binaries.

// Re-export the main types
pub use pokemon_types::*;
pub use profiles::*;
pub use team::*;

pub mod pokemon_types;
pub mod profiles;
pub mod team;
