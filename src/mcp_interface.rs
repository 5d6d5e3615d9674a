//! Rendering functions shared by the CLI and the MCP server.
//!
//! Everything user-facing is formatted here so the two surfaces can never
//! drift apart; both binaries print exactly what these functions return.

use crate::analysis::TeamReport;
use schema::{PokemonType, Roster, SpeciesProfile};

/// Render a parsed roster as a short confirmation listing.
pub fn render_roster(roster: &Roster) -> String {
    let mut output = String::from("Parsed team:\n");
    for (i, member) in roster.members.iter().enumerate() {
        let item = member
            .item
            .as_deref()
            .map(|i| format!(" @ {}", i))
            .unwrap_or_default();
        output.push_str(&format!("  {}. {}{}\n", i + 1, member.name, item));
        if !member.moves.is_empty() {
            output.push_str(&format!("     Moves: {}\n", member.moves.join(", ")));
        }
    }
    output
}

/// Render the full report as readable text.
pub fn render_report(report: &TeamReport) -> String {
    let mut output = String::new();

    output.push_str("=== Team Analysis ===\n");
    output.push_str(&report.summary);
    output.push_str("\n\n");

    if !report.threats.is_empty() {
        output.push_str("--- Top Threats ---\n");
        for threat in &report.threats {
            output.push_str(&format!(
                "  {} (pressures {:.0}% of the team)\n",
                threat.species,
                threat.pressure * 100.0
            ));
            for reason in &threat.reasons {
                output.push_str(&format!("    - {}\n", reason));
            }
        }
        output.push('\n');
    }

    if !report.coverage_gaps.is_empty() {
        output.push_str("--- Coverage Gaps ---\n");
        for gap in &report.coverage_gaps {
            output.push_str(&format!("  - {}\n", gap));
        }
        output.push('\n');
    }

    output.push_str("--- Per-Pokemon Notes ---\n");
    for insight in &report.insights {
        let role = insight
            .role
            .map(|r| r.to_string())
            .unwrap_or_else(|| "Unspecified role".to_string());
        output.push_str(&format!("  {} [{}]\n", insight.member, role));
        for strength in &insight.strengths {
            output.push_str(&format!("    + {}\n", strength));
        }
        for risk in &insight.risks {
            output.push_str(&format!("    ! {}\n", risk));
        }
    }
    output.push('\n');

    if !report.strategies.is_empty() {
        output.push_str("--- Detected Strategies ---\n");
        for strategy in &report.strategies {
            output.push_str(&format!(
                "  {} ({:.0}% confidence): {}\n",
                strategy.name,
                strategy.confidence * 100.0,
                strategy.summary
            ));
        }
        output.push('\n');
    }

    if !report.recommendations.is_empty() {
        output.push_str("--- Recommendations ---\n");
        for (i, rec) in report.recommendations.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, rec));
        }
        output.push('\n');
    }

    output.push_str(&render_completeness(report));
    output
}

fn render_completeness(report: &TeamReport) -> String {
    let c = &report.completeness;
    if c.is_complete() {
        "Data completeness: all lookups resolved.\n".to_string()
    } else {
        format!(
            "Data completeness: {}/{} dex lookups failed, {}/{} usage lookups missing{}.\n",
            c.lookups_failed,
            c.lookups_attempted,
            c.usage_missing,
            c.usage_attempted,
            if c.usage_data_unavailable {
                " (metagame data unavailable)"
            } else {
                ""
            }
        )
    }
}

/// Render a species record for the lookup tool.
pub fn render_species(profile: &SpeciesProfile) -> String {
    let types: Vec<String> = profile.types.iter().map(|t| t.to_string()).collect();
    let stats = &profile.base_stats;
    let mut output = format!("{}\n", profile.name);
    output.push_str(&format!("  Type(s): {}\n", types.join(" / ")));
    output.push_str(&format!(
        "  Base stats: HP {} / Atk {} / Def {} / SpA {} / SpD {} / Spe {}\n",
        stats.hp, stats.attack, stats.defense, stats.sp_attack, stats.sp_defense, stats.speed
    ));
    if !profile.abilities.is_empty() {
        output.push_str(&format!("  Abilities: {}\n", profile.abilities.join(", ")));
    }
    output
}

/// Render the multiplier of an attack type into a defensive typing.
pub fn render_matchup(attacking: PokemonType, defending: &[PokemonType]) -> String {
    let multiplier = PokemonType::defensive_multiplier(attacking, defending);
    let defending_names: Vec<String> = defending.iter().map(|t| t.to_string()).collect();
    let verdict = if multiplier == 0.0 {
        "no effect"
    } else if multiplier >= 2.0 {
        "super-effective"
    } else if multiplier < 1.0 {
        "resisted"
    } else {
        "neutral"
    };
    format!(
        "{} vs {}: {}x ({})",
        attacking,
        defending_names.join("/"),
        multiplier,
        verdict
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::BaseStats;

    #[test]
    fn matchup_rendering_names_the_verdict() {
        let text = render_matchup(
            PokemonType::Rock,
            &[PokemonType::Fire, PokemonType::Flying],
        );
        assert_eq!(text, "Rock vs Fire/Flying: 4x (super-effective)");
        let immune = render_matchup(PokemonType::Ground, &[PokemonType::Flying]);
        assert!(immune.contains("0x (no effect)"));
    }

    #[test]
    fn species_rendering_includes_stats_line() {
        let profile = SpeciesProfile {
            name: "Incineroar".to_string(),
            types: vec![PokemonType::Fire, PokemonType::Dark],
            base_stats: BaseStats {
                hp: 95,
                attack: 115,
                defense: 90,
                sp_attack: 80,
                sp_defense: 90,
                speed: 60,
            },
            abilities: vec!["Intimidate".to_string()],
        };
        let text = render_species(&profile);
        assert!(text.contains("Fire / Dark"));
        assert!(text.contains("Spe 60"));
        assert!(text.contains("Intimidate"));
    }
}
