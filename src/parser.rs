//! Parser for Smogon-style team export text.
//!
//! Accepts the paste format used by Showdown and Smogon: blank-line
//! separated entries, each with a `Name @ Item` header followed by
//! `Ability:` / `Tera Type:` / `EVs:` / `IVs:` / `... Nature` / `- Move`
//! lines. Unrecognized lines are kept as member notes rather than rejected.

use crate::errors::{ParseError, ParseResult, RosterError};
use schema::{
    Member, Nature, PokemonType, Roster, StatName, MAX_EV, MAX_EV_TOTAL, MAX_MOVES_PER_MEMBER,
    MAX_ROSTER_SIZE,
};

/// Parse a Smogon-format team export into a validated [`Roster`].
pub fn parse_team(raw_text: &str) -> ParseResult<Roster> {
    parse_named_team(raw_text, None)
}

pub fn parse_named_team(raw_text: &str, name: Option<&str>) -> ParseResult<Roster> {
    let cleaned = raw_text.trim();
    if cleaned.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut members = Vec::new();
    for (idx, chunk) in split_entries(cleaned).into_iter().enumerate() {
        members.push(parse_entry(chunk, idx)?);
    }

    if members.is_empty() {
        return Err(RosterError::Empty.into());
    }
    if members.len() > MAX_ROSTER_SIZE {
        return Err(RosterError::TooLarge(members.len()).into());
    }

    Ok(Roster {
        name: name.map(str::to_string),
        members,
    })
}

fn split_entries(text: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = None;
    let mut offset = 0;
    // Entries are separated by one or more blank (whitespace-only) lines.
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if let Some(begin) = start.take() {
                entries.push(text[begin..offset].trim());
            }
        } else if start.is_none() {
            start = Some(offset);
        }
        offset += line.len();
    }
    if let Some(begin) = start {
        entries.push(text[begin..].trim());
    }
    entries.retain(|e| !e.is_empty());
    entries
}

fn parse_entry(chunk: &str, entry_index: usize) -> ParseResult<Member> {
    let mut lines = chunk.lines().map(str::trim).filter(|l| !l.is_empty());

    let header = lines.next().ok_or(ParseError::MissingSpecies(entry_index))?;
    let (name, item) = parse_header(header);
    let mut member = Member::new(name.clone(), infer_species(&name));
    member.item = item;

    for line in lines {
        if let Some(rest) = line.strip_prefix("Ability:") {
            member.ability = non_empty(rest);
        } else if let Some(rest) = line.strip_prefix("Tera Type:") {
            member.tera_type = rest.trim().parse::<PokemonType>().ok();
        } else if let Some(rest) = line.strip_prefix("EVs:") {
            member.evs = parse_stat_spread(rest, 0);
            validate_evs(&member)?;
        } else if let Some(rest) = line.strip_prefix("IVs:") {
            member.ivs = parse_stat_spread(rest, 31);
        } else if let Some(rest) = line.strip_suffix("Nature") {
            member.nature = rest.trim().parse::<Nature>().ok();
        } else if let Some(rest) = line.strip_prefix('-') {
            let move_name = rest.trim();
            if !move_name.is_empty() {
                member.moves.push(move_name.to_string());
            }
        } else {
            member.notes.push(line.to_string());
        }
    }

    if member.moves.len() > MAX_MOVES_PER_MEMBER {
        return Err(ParseError::TooManyMoves {
            member: member.name,
            count: member.moves.len(),
        });
    }

    Ok(member)
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Split a `Name @ Item` header. The item part is optional.
fn parse_header(line: &str) -> (String, Option<String>) {
    match line.split_once('@') {
        Some((name, item)) => (name.trim().to_string(), non_empty(item)),
        None => (line.trim().to_string(), None),
    }
}

/// Parse an `NNN Stat / NNN Stat / ...` spread. Slots not mentioned keep
/// `default` (0 for EVs, 31 for IVs). Malformed tokens are skipped.
fn parse_stat_spread(spread: &str, default: u8) -> [u8; 6] {
    let mut stats = [default; 6];
    for token in spread.split('/') {
        let mut parts = token.split_whitespace();
        let (Some(value), Some(stat)) = (parts.next(), parts.next()) else {
            continue;
        };
        let (Ok(value), Ok(stat)) = (value.parse::<u16>(), stat.parse::<StatName>()) else {
            continue;
        };
        stats[stat.index()] = value.min(u8::MAX as u16) as u8;
    }
    stats
}

fn validate_evs(member: &Member) -> ParseResult<()> {
    for stat in StatName::ALL {
        let value = member.ev(stat);
        if value > MAX_EV {
            return Err(ParseError::EvOutOfRange {
                member: member.name.clone(),
                stat: stat.to_string(),
                value: value as u16,
            });
        }
    }
    let total: u16 = member.evs.iter().map(|&v| v as u16).sum();
    if total > MAX_EV_TOTAL {
        return Err(ParseError::EvTotalExceeded {
            member: member.name.clone(),
            total,
        });
    }
    Ok(())
}

/// Pull the species out of a header name. Nicknamed sets write the species
/// in parentheses ("Lando (Landorus-Therian)"); a bare "(M)"/"(F)" is a
/// gender marker, not a species.
fn infer_species(name: &str) -> String {
    if let Some(open) = name.rfind('(') {
        if let Some(close) = name[open..].find(')') {
            let candidate = name[open + 1..open + close].trim();
            if !candidate.is_empty() && !candidate.eq_ignore_ascii_case("M")
                && !candidate.eq_ignore_ascii_case("F")
            {
                return candidate.to_string();
            }
            // Strip the gender marker; the rest may still hold a
            // nickname + species pair.
            let stripped = format!("{}{}", &name[..open], &name[open + close + 1..]);
            let stripped = stripped.trim();
            if !stripped.is_empty() {
                return infer_species(stripped);
            }
        }
    }
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FLUTTER_MANE: &str = "\
Flutter Mane @ Booster Energy
Ability: Protosynthesis
Level: 50
Tera Type: Fairy
EVs: 116 HP / 132 Def / 4 SpA / 4 SpD / 252 Spe
Timid Nature
IVs: 0 Atk
- Moonblast
- Shadow Ball
- Icy Wind
- Protect";

    #[test]
    fn parses_a_full_set() {
        let roster = parse_team(FLUTTER_MANE).unwrap();
        assert_eq!(roster.len(), 1);

        let member = &roster.members[0];
        assert_eq!(member.name, "Flutter Mane");
        assert_eq!(member.species, "Flutter Mane");
        assert_eq!(member.item.as_deref(), Some("Booster Energy"));
        assert_eq!(member.ability.as_deref(), Some("Protosynthesis"));
        assert_eq!(member.tera_type, Some(PokemonType::Fairy));
        assert_eq!(member.nature, Some(Nature::Timid));
        assert_eq!(member.ev(StatName::Hp), 116);
        assert_eq!(member.ev(StatName::Spe), 252);
        assert_eq!(member.iv(StatName::Atk), 0);
        assert_eq!(member.iv(StatName::Spe), 31);
        assert_eq!(member.moves.len(), 4);
        assert_eq!(member.moves[0], "Moonblast");
        // "Level: 50" is not part of the analyzed model; it lands in notes.
        assert_eq!(member.notes, vec!["Level: 50".to_string()]);
    }

    #[test]
    fn parses_nicknames_and_gender_markers() {
        let text = "Lando (Landorus-Therian) @ Choice Scarf\n- Earthquake\n\nRilla (Rillaboom) (M)\n- Grassy Glide";
        let roster = parse_team(text).unwrap();
        assert_eq!(roster.members[0].species, "Landorus-Therian");
        assert_eq!(roster.members[1].species, "Rillaboom");
    }

    #[test]
    fn splits_entries_on_blank_lines() {
        let text = "Incineroar\n- Fake Out\n\n\nAmoonguss\n- Spore";
        let roster = parse_team(text).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.members[1].name, "Amoonguss");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_team("   \n  \n"), Err(ParseError::EmptyInput));
    }

    #[test]
    fn oversized_roster_is_rejected() {
        let text = (0..7)
            .map(|i| format!("Pikachu{}\n- Thunderbolt", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        assert_eq!(
            parse_team(&text),
            Err(ParseError::Roster(RosterError::TooLarge(7)))
        );
    }

    #[test]
    fn single_ev_above_cap_is_rejected() {
        let text = "Incineroar\nEVs: 255 Atk\n- Knock Off";
        match parse_team(&text) {
            Err(ParseError::EvOutOfRange { stat, value, .. }) => {
                assert_eq!(stat, "Atk");
                assert_eq!(value, 255);
            }
            other => panic!("expected EvOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn ev_total_above_budget_is_rejected() {
        let text = "Incineroar\nEVs: 252 HP / 252 Atk / 252 Spe\n- Knock Off";
        match parse_team(&text) {
            Err(ParseError::EvTotalExceeded { total, .. }) => assert_eq!(total, 756),
            other => panic!("expected EvTotalExceeded, got {:?}", other),
        }
    }

    #[test]
    fn five_moves_are_rejected() {
        let text = "Smeargle\n- Spore\n- Follow Me\n- Fake Out\n- Wide Guard\n- Decorate";
        assert!(matches!(
            parse_team(text),
            Err(ParseError::TooManyMoves { count: 5, .. })
        ));
    }

    #[test]
    fn unknown_tera_type_is_dropped_not_fatal() {
        let text = "Ogerpon\nTera Type: Stellar\n- Ivy Cudgel";
        let roster = parse_team(text).unwrap();
        assert_eq!(roster.members[0].tera_type, None);
    }
}
