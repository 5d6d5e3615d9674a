//! RON-backed pokedex provider.
//!
//! Species and move records live in `data/species.ron` and `data/moves.ron`
//! and are loaded once at startup. Lookups are keyed by slug, so
//! "Landorus-Therian", "landorus therian", and "LANDORUS-THERIAN" all hit
//! the same record.

use crate::errors::{DatasetError, DatasetResult};
use crate::providers::{slugify, PokedexProvider};
use schema::{Lookup, MoveProfile, SpeciesProfile};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const SPECIES_FILE: &str = "species.ron";
pub const MOVES_FILE: &str = "moves.ron";

#[derive(Debug, Default)]
pub struct DexData {
    species: HashMap<String, SpeciesProfile>,
    moves: HashMap<String, MoveProfile>,
}

impl DexData {
    /// Load both dataset files from a data directory.
    ///
    /// Records with an impossible type count (no types, or more than two)
    /// are dropped at load time; they later answer `NotFound` like any
    /// other unknown identifier.
    pub fn load(data_path: &Path) -> DatasetResult<Self> {
        let species: Vec<SpeciesProfile> = load_ron(&data_path.join(SPECIES_FILE))?;
        let moves: Vec<MoveProfile> = load_ron(&data_path.join(MOVES_FILE))?;
        Ok(Self::from_parts(species, moves))
    }

    /// Build a dex from in-memory records (used by tests and fixtures).
    pub fn from_parts(species: Vec<SpeciesProfile>, moves: Vec<MoveProfile>) -> Self {
        let species = species
            .into_iter()
            .filter(|s| !s.types.is_empty() && s.types.len() <= 2)
            .map(|s| (slugify(&s.name), s))
            .collect();
        let moves = moves
            .into_iter()
            .map(|m| (slugify(&m.name), m))
            .collect();
        DexData { species, moves }
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    fn species_sync(&self, id: &str) -> Lookup<SpeciesProfile> {
        let slug = slugify(id);
        if slug.is_empty() {
            return Lookup::NotFound;
        }
        self.species.get(&slug).cloned().into()
    }

    fn move_sync(&self, id: &str) -> Lookup<MoveProfile> {
        let slug = slugify(id);
        if slug.is_empty() {
            return Lookup::NotFound;
        }
        self.moves.get(&slug).cloned().into()
    }
}

impl PokedexProvider for DexData {
    fn species(&self, id: &str) -> impl std::future::Future<Output = Lookup<SpeciesProfile>> + Send {
        let result = self.species_sync(id);
        async move { result }
    }

    fn move_profile(&self, id: &str) -> impl std::future::Future<Output = Lookup<MoveProfile>> + Send {
        let result = self.move_sync(id);
        async move { result }
    }
}

fn load_ron<T: DeserializeOwned>(path: &Path) -> DatasetResult<T> {
    let text = fs::read_to_string(path).map_err(|e| DatasetError::FileRead {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    ron::from_str(&text).map_err(|e| DatasetError::Malformed {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}
