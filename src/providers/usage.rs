//! Usage-snapshot provider.
//!
//! Consumes the JSON ladder snapshots that the upstream scraping client
//! caches to disk, one file per format (`data/usage/<format>.json`). The
//! HTTP/HTML layer that produces those snapshots stays outside this crate;
//! the analyzer only ever sees the validated [`UsageProfile`] records.

use crate::errors::{DatasetError, DatasetResult};
use crate::providers::{ResponseCache, UsageProvider};
use ordered_float::OrderedFloat;
use schema::{
    fold_species_name, BaseStats, Lookup, MatchupRecord, PokemonType, TeammateUsage, UsageProfile,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Raw snapshot records, in the shape the scraper writes them.
#[derive(Debug, Deserialize)]
struct SnapshotEntry {
    name: String,
    /// Usage percent (0-100) as published, or an already-normalized rate.
    #[serde(default)]
    usage: f32,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    stats: Option<SnapshotStats>,
    #[serde(default)]
    moves: Vec<SnapshotMove>,
    #[serde(default)]
    teammates: Vec<SnapshotTeammate>,
    #[serde(default)]
    checks: Vec<SnapshotCheck>,
}

#[derive(Debug, Deserialize)]
struct SnapshotStats {
    #[serde(default)]
    hp: u8,
    #[serde(default)]
    atk: u8,
    #[serde(default)]
    def: u8,
    #[serde(default)]
    spa: u8,
    #[serde(default)]
    spd: u8,
    #[serde(default)]
    spe: u8,
}

#[derive(Debug, Deserialize)]
struct SnapshotMove {
    name: String,
    #[serde(rename = "type", default)]
    move_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotTeammate {
    name: String,
    #[serde(default)]
    usage: f32,
}

#[derive(Debug, Deserialize)]
struct SnapshotCheck {
    name: String,
    #[serde(default)]
    win_rate: f32,
}

struct FormatUsage {
    /// Entries ranked by usage rate descending, name ascending.
    ranked: Vec<UsageProfile>,
    by_key: HashMap<String, usize>,
}

/// Usage provider backed by on-disk snapshots.
pub struct UsageSnapshot {
    formats: HashMap<String, FormatUsage>,
    cache: Option<ResponseCache<Lookup<UsageProfile>>>,
}

impl UsageSnapshot {
    pub fn empty() -> Self {
        UsageSnapshot {
            formats: HashMap::new(),
            cache: None,
        }
    }

    /// Load every `<format>.json` file found in a snapshot directory.
    pub fn load_dir(dir: &Path) -> DatasetResult<Self> {
        let mut snapshot = UsageSnapshot::empty();
        let entries = fs::read_dir(dir).map_err(|e| DatasetError::FileRead {
            path: dir.display().to_string(),
            detail: e.to_string(),
        })?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(format) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            snapshot.load_format(format, &path)?;
        }
        Ok(snapshot)
    }

    /// Load one snapshot file as the given format.
    pub fn load_format(&mut self, format: &str, path: &Path) -> DatasetResult<()> {
        let text = fs::read_to_string(path).map_err(|e| DatasetError::FileRead {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        let raw: Vec<SnapshotEntry> =
            serde_json::from_str(&text).map_err(|e| DatasetError::Malformed {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;
        let profiles = raw.into_iter().map(convert_entry).collect();
        self.insert_format(format, profiles);
        Ok(())
    }

    /// Build a snapshot from in-memory profiles (tests and fixtures).
    pub fn from_entries(format: &str, entries: Vec<UsageProfile>) -> Self {
        let mut snapshot = UsageSnapshot::empty();
        snapshot.insert_format(format, entries);
        snapshot
    }

    /// Attach a response cache for lookup results. The cache is supplied by
    /// the caller; the provider never creates shared state on its own.
    pub fn with_cache(mut self, cache: ResponseCache<Lookup<UsageProfile>>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn formats(&self) -> Vec<&str> {
        self.formats.keys().map(String::as_str).collect()
    }

    fn insert_format(&mut self, format: &str, mut entries: Vec<UsageProfile>) {
        entries.sort_by(|a, b| {
            OrderedFloat(b.usage_rate)
                .cmp(&OrderedFloat(a.usage_rate))
                .then_with(|| a.species.cmp(&b.species))
        });
        let by_key = entries
            .iter()
            .enumerate()
            .map(|(i, p)| (fold_species_name(&p.species), i))
            .collect();
        self.formats.insert(
            format.to_string(),
            FormatUsage {
                ranked: entries,
                by_key,
            },
        );
    }

    fn usage_sync(&self, species: &str, format: &str) -> Lookup<UsageProfile> {
        let key = fold_species_name(species);
        if key.is_empty() {
            return Lookup::NotFound;
        }
        if let Some(cache) = &self.cache {
            let cache_key = format!("usage:{}:{}", format, key);
            return cache.get_or_fill(&cache_key, || self.find(&key, format));
        }
        self.find(&key, format)
    }

    fn find(&self, key: &str, format: &str) -> Lookup<UsageProfile> {
        self.formats
            .get(format)
            .and_then(|f| f.by_key.get(key).map(|&i| f.ranked[i].clone()))
            .into()
    }

    fn top_sync(&self, format: &str, limit: usize) -> Vec<UsageProfile> {
        self.formats
            .get(format)
            .map(|f| f.ranked.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}

impl UsageProvider for UsageSnapshot {
    fn usage(
        &self,
        species: &str,
        format: &str,
    ) -> impl std::future::Future<Output = Lookup<UsageProfile>> + Send {
        let result = self.usage_sync(species, format);
        async move { result }
    }

    fn top_usage(
        &self,
        format: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Vec<UsageProfile>> + Send {
        let result = self.top_sync(format, limit);
        async move { result }
    }
}

fn convert_entry(entry: SnapshotEntry) -> UsageProfile {
    let types = parse_types(&entry.types);
    let mut move_types: Vec<PokemonType> = entry
        .moves
        .iter()
        .filter_map(|m| {
            m.move_type
                .as_deref()
                .and_then(|t| t.parse::<PokemonType>().ok())
        })
        .collect();
    move_types.sort();
    move_types.dedup();

    UsageProfile {
        species: entry.name,
        usage_rate: normalize_rate(entry.usage),
        types,
        base_stats: entry.stats.map(|s| BaseStats {
            hp: s.hp,
            attack: s.atk,
            defense: s.def,
            sp_attack: s.spa,
            sp_defense: s.spd,
            speed: s.spe,
        }),
        move_types,
        teammates: entry
            .teammates
            .into_iter()
            .map(|t| TeammateUsage {
                species: t.name,
                usage: normalize_rate(t.usage),
            })
            .collect(),
        checks: entry
            .checks
            .into_iter()
            .map(|c| MatchupRecord {
                species: c.name,
                win_rate: normalize_rate(c.win_rate),
            })
            .collect(),
    }
}

/// A type string that does not parse is an upstream inconsistency; the
/// record keeps going without it rather than failing the whole snapshot.
fn parse_types(raw: &[String]) -> Vec<PokemonType> {
    raw.iter()
        .filter_map(|t| t.parse::<PokemonType>().ok())
        .take(2)
        .collect()
}

/// Snapshots publish percentages; older ones already store rates in [0,1].
fn normalize_rate(value: f32) -> f32 {
    let rate = if value > 1.0 { value / 100.0 } else { value };
    rate.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SNAPSHOT: &str = r#"[
        {
            "name": "Flutter Mane",
            "usage": 38.2,
            "types": ["ghost", "fairy"],
            "stats": {"hp": 55, "atk": 55, "def": 55, "spa": 135, "spd": 135, "spe": 135},
            "moves": [
                {"name": "Moonblast", "type": "fairy"},
                {"name": "Shadow Ball", "type": "ghost"},
                {"name": "Protect"}
            ],
            "teammates": [{"name": "Chien-Pao", "usage": 31.0}],
            "checks": [{"name": "Kingambit", "win_rate": 61.5}]
        },
        {
            "name": "Incineroar",
            "usage": 45.0,
            "types": ["fire", "dark"],
            "moves": [{"name": "Knock Off", "type": "dark"}]
        },
        {
            "name": "Glitchmon",
            "usage": 2.0,
            "types": ["shadow"]
        }
    ]"#;

    fn sample_snapshot() -> UsageSnapshot {
        let raw: Vec<SnapshotEntry> = serde_json::from_str(SNAPSHOT).unwrap();
        UsageSnapshot::from_entries(
            "gen9vgc2025regh",
            raw.into_iter().map(convert_entry).collect(),
        )
    }

    #[tokio::test]
    async fn entries_rank_by_usage_descending() {
        let snapshot = sample_snapshot();
        let top = snapshot.top_usage("gen9vgc2025regh", 2).await;
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].species, "Incineroar");
        assert_eq!(top[1].species, "Flutter Mane");
    }

    #[tokio::test]
    async fn lookup_folds_names_and_normalizes_rates() {
        let snapshot = sample_snapshot();
        let profile = snapshot
            .usage("flutter-mane", "gen9vgc2025regh")
            .await
            .found()
            .unwrap();
        assert!((profile.usage_rate - 0.382).abs() < 1e-6);
        assert_eq!(profile.types, vec![PokemonType::Ghost, PokemonType::Fairy]);
        assert_eq!(
            profile.move_types,
            vec![PokemonType::Ghost, PokemonType::Fairy]
        );
        assert!((profile.checks[0].win_rate - 0.615).abs() < 1e-6);
    }

    #[tokio::test]
    async fn unknown_species_and_formats_answer_not_found() {
        let snapshot = sample_snapshot();
        assert_eq!(
            snapshot.usage("Pikachu", "gen9vgc2025regh").await,
            Lookup::NotFound
        );
        assert_eq!(
            snapshot.usage("Incineroar", "gen5ou").await,
            Lookup::NotFound
        );
        assert!(snapshot.top_usage("gen5ou", 10).await.is_empty());
    }

    #[tokio::test]
    async fn unparseable_types_degrade_to_empty() {
        let snapshot = sample_snapshot();
        let glitch = snapshot
            .usage("Glitchmon", "gen9vgc2025regh")
            .await
            .found()
            .unwrap();
        assert!(glitch.types.is_empty());
    }
}
