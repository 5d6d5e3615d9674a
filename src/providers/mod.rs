//! Data provider boundary.
//!
//! The analysis core never performs I/O. It talks to two injected
//! capabilities: a pokedex (species + move records) and a usage-statistics
//! source for a competitive format. Both answer [`Lookup::NotFound`] for
//! unknown identifiers instead of erroring, so a missing record degrades to
//! an "unknown data" note rather than failing an analysis.

pub mod cache;
pub mod dex;
pub mod usage;

pub use cache::ResponseCache;
pub use dex::DexData;
pub use usage::UsageSnapshot;

use schema::{Lookup, MoveProfile, SpeciesProfile, UsageProfile};
use std::future::Future;

/// Species and move lookups by identifier.
///
/// Lookups are the analysis chain's only suspension points; per-member
/// lookups fan out concurrently, so the returned futures must be `Send`.
pub trait PokedexProvider: Send + Sync + 'static {
    fn species(&self, id: &str) -> impl Future<Output = Lookup<SpeciesProfile>> + Send;

    fn move_profile(&self, id: &str) -> impl Future<Output = Lookup<MoveProfile>> + Send;
}

/// Per-format metagame usage lookups.
pub trait UsageProvider: Send + Sync + 'static {
    /// Usage record for one (species, format) pair.
    fn usage(&self, species: &str, format: &str)
        -> impl Future<Output = Lookup<UsageProfile>> + Send;

    /// The `limit` highest-usage species of a format, ranked descending.
    fn top_usage(&self, format: &str, limit: usize)
        -> impl Future<Output = Vec<UsageProfile>> + Send;
}

/// Normalize an identifier the way the upstream dex endpoints do: lowercase,
/// spaces and dots to hyphens, punctuation dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for c in name.trim().chars() {
        match c {
            ' ' | '.' | '-' | '_' => {
                if !last_hyphen {
                    slug.push('-');
                    last_hyphen = true;
                }
            }
            c if c.is_ascii_alphanumeric() => {
                slug.push(c.to_ascii_lowercase());
                last_hyphen = false;
            }
            _ => {}
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_matches_dex_conventions() {
        assert_eq!(slugify("Landorus-Therian"), "landorus-therian");
        assert_eq!(slugify("Mr. Mime"), "mr-mime");
        assert_eq!(slugify("Farfetch'd"), "farfetchd");
        assert_eq!(slugify("  Iron Hands  "), "iron-hands");
        assert_eq!(slugify("Flutter   Mane"), "flutter-mane");
    }
}
