use crate::analysis::context::{MemberContext, ResolvedMove};
use crate::providers::{DexData, UsageSnapshot};
use schema::{
    BaseStats, MatchupRecord, Member, MoveCategory, MoveProfile, Nature, PokemonType,
    Roster, SpeciesProfile, StatName, UsageProfile,
};
use std::sync::Arc;

/// A builder for creating test members with common defaults.
///
/// # Example
/// ```
/// let member = TestMemberBuilder::new("Incineroar")
///     .with_moves(&["Fake Out", "Knock Off"])
///     .with_nature(Nature::Adamant)
///     .build();
/// ```
pub struct TestMemberBuilder {
    member: Member,
}

impl TestMemberBuilder {
    pub fn new(species: &str) -> Self {
        TestMemberBuilder {
            member: Member::new(species, species),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.member.name = name.to_string();
        self
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.member.moves = moves.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_item(mut self, item: &str) -> Self {
        self.member.item = Some(item.to_string());
        self
    }

    pub fn with_ability(mut self, ability: &str) -> Self {
        self.member.ability = Some(ability.to_string());
        self
    }

    pub fn with_nature(mut self, nature: Nature) -> Self {
        self.member.nature = Some(nature);
        self
    }

    pub fn with_tera(mut self, tera: PokemonType) -> Self {
        self.member.tera_type = Some(tera);
        self
    }

    pub fn with_ev(mut self, stat: StatName, value: u8) -> Self {
        self.member.evs[stat.index()] = value;
        self
    }

    pub fn with_iv(mut self, stat: StatName, value: u8) -> Self {
        self.member.ivs[stat.index()] = value;
        self
    }

    pub fn build(self) -> Member {
        self.member
    }
}

pub fn roster_of(members: Vec<Member>) -> Roster {
    Roster {
        name: None,
        members,
    }
}

fn stats(hp: u8, attack: u8, defense: u8, sp_attack: u8, sp_defense: u8, speed: u8) -> BaseStats {
    BaseStats {
        hp,
        attack,
        defense,
        sp_attack,
        sp_defense,
        speed,
    }
}

fn species(name: &str, types: &[PokemonType], base: BaseStats, abilities: &[&str]) -> SpeciesProfile {
    SpeciesProfile {
        name: name.to_string(),
        types: types.to_vec(),
        base_stats: base,
        abilities: abilities.iter().map(|a| a.to_string()).collect(),
    }
}

fn damaging(name: &str, move_type: PokemonType, category: MoveCategory, power: u16) -> MoveProfile {
    MoveProfile {
        name: name.to_string(),
        move_type,
        category,
        power: Some(power),
        priority: 0,
    }
}

fn status(name: &str, move_type: PokemonType) -> MoveProfile {
    MoveProfile {
        name: name.to_string(),
        move_type,
        category: MoveCategory::Status,
        power: None,
        priority: 0,
    }
}

fn priority(name: &str, move_type: PokemonType, power: u16, priority: i8) -> MoveProfile {
    MoveProfile {
        name: name.to_string(),
        move_type,
        category: MoveCategory::Physical,
        power: Some(power),
        priority,
    }
}

/// A fixed in-memory dex covering the species and moves the tests lean on.
pub fn fixture_dex() -> Arc<DexData> {
    use MoveCategory::{Physical, Special};
    use PokemonType::*;

    Arc::new(DexData::from_parts(
        vec![
            species("Charizard", &[Fire, Flying], stats(78, 84, 78, 109, 85, 100), &["Blaze"]),
            species("Talonflame", &[Fire, Flying], stats(78, 81, 71, 74, 69, 126), &["Gale Wings"]),
            species("Moltres", &[Fire, Flying], stats(90, 100, 90, 125, 85, 90), &["Pressure"]),
            species(
                "Incineroar",
                &[Fire, Dark],
                stats(95, 115, 90, 80, 90, 60),
                &["Intimidate"],
            ),
            species(
                "Flutter Mane",
                &[Ghost, Fairy],
                stats(55, 55, 55, 135, 135, 135),
                &["Protosynthesis"],
            ),
            species(
                "Amoonguss",
                &[Grass, Poison],
                stats(114, 85, 70, 85, 80, 30),
                &["Regenerator"],
            ),
            species(
                "Landorus-Therian",
                &[Ground, Flying],
                stats(89, 145, 90, 105, 80, 91),
                &["Intimidate"],
            ),
            species(
                "Iron Hands",
                &[Fighting, Electric],
                stats(154, 140, 108, 50, 68, 50),
                &["Quark Drive"],
            ),
            species("Rillaboom", &[Grass], stats(100, 125, 90, 60, 70, 85), &["Grassy Surge"]),
            species("Torkoal", &[Fire], stats(70, 85, 140, 85, 70, 20), &["Drought"]),
            species("Pikachu", &[Electric], stats(35, 55, 40, 50, 50, 90), &["Static"]),
        ],
        vec![
            damaging("Flamethrower", Fire, Special, 90),
            damaging("Heat Wave", Fire, Special, 95),
            damaging("Brave Bird", Flying, Physical, 120),
            damaging("Air Slash", Flying, Special, 75),
            damaging("Earthquake", Ground, Physical, 100),
            damaging("Moonblast", Fairy, Special, 95),
            damaging("Shadow Ball", Ghost, Special, 80),
            damaging("Icy Wind", Ice, Special, 55),
            damaging("Thunderbolt", Electric, Special, 90),
            damaging("Knock Off", Dark, Physical, 65),
            damaging("Wood Hammer", Grass, Physical, 120),
            damaging("Close Combat", Fighting, Physical, 120),
            damaging("Drain Punch", Fighting, Physical, 75),
            priority("Fake Out", Normal, 40, 3),
            priority("Aqua Jet", Water, 40, 1),
            status("Protect", Normal),
            status("Spore", Grass),
            status("Tailwind", Flying),
            status("Will-O-Wisp", Fire),
            MoveProfile {
                name: "Trick Room".to_string(),
                move_type: Psychic,
                category: MoveCategory::Status,
                power: None,
                priority: -7,
            },
        ],
    ))
}

pub fn usage_profile(
    name: &str,
    usage_percent: f32,
    types: &[PokemonType],
    move_types: &[PokemonType],
    checks: &[(&str, f32)],
) -> UsageProfile {
    UsageProfile {
        species: name.to_string(),
        usage_rate: usage_percent / 100.0,
        types: types.to_vec(),
        base_stats: None,
        move_types: move_types.to_vec(),
        teammates: Vec::new(),
        checks: checks
            .iter()
            .map(|(species, win_rate)| MatchupRecord {
                species: species.to_string(),
                win_rate: *win_rate,
            })
            .collect(),
    }
}

pub const FORMAT: &str = "gen9testformat";

/// A small usage snapshot for the test format.
pub fn fixture_usage() -> Arc<UsageSnapshot> {
    use PokemonType::*;
    Arc::new(UsageSnapshot::from_entries(
        FORMAT,
        vec![
            usage_profile(
                "Incineroar",
                45.0,
                &[Fire, Dark],
                &[Fire, Dark, Normal],
                &[("Urshifu-Rapid-Strike", 0.63)],
            ),
            usage_profile(
                "Chien-Pao",
                27.0,
                &[Dark, Ice],
                &[Ice, Dark],
                &[("Iron Hands", 0.58)],
            ),
            usage_profile(
                "Kingambit",
                24.0,
                &[Dark, Steel],
                &[Dark, Steel],
                &[("Urshifu-Rapid-Strike", 0.62)],
            ),
            usage_profile("Tornadus", 17.0, &[Flying], &[Flying], &[]),
        ],
    ))
}

/// An empty snapshot: every usage lookup answers NotFound.
pub fn empty_usage() -> Arc<UsageSnapshot> {
    Arc::new(UsageSnapshot::empty())
}

/// Build a resolved member context directly, bypassing the providers, for
/// engine-level tests that do not need async resolution.
pub fn resolved_context(
    name: &str,
    types: &[PokemonType],
    moves: &[MoveProfile],
) -> MemberContext {
    MemberContext {
        name: name.to_string(),
        species_id: name.to_string(),
        species: (!types.is_empty()).then(|| {
            species(name, types, stats(80, 80, 80, 80, 80, 80), &[])
        }),
        moves: moves
            .iter()
            .map(|profile| ResolvedMove {
                name: profile.name.clone(),
                profile: Some(profile.clone()),
            })
            .collect(),
        usage: None,
        notes: Vec::new(),
    }
}

/// Context for a member whose species could not be resolved at all.
pub fn unresolved_context(name: &str) -> MemberContext {
    MemberContext {
        name: name.to_string(),
        species_id: String::new(),
        species: None,
        moves: Vec::new(),
        usage: None,
        notes: vec!["unknown data: blank species identifier".to_string()],
    }
}

pub fn fire_move() -> MoveProfile {
    damaging("Flamethrower", PokemonType::Fire, MoveCategory::Special, 90)
}

pub fn flying_move() -> MoveProfile {
    damaging("Brave Bird", PokemonType::Flying, MoveCategory::Physical, 120)
}

pub fn ground_move() -> MoveProfile {
    damaging("Earthquake", PokemonType::Ground, MoveCategory::Physical, 100)
}

pub fn status_move() -> MoveProfile {
    status("Protect", PokemonType::Normal)
}
