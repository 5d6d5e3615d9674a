use crate::analysis::strategy::detect_strategies;
use crate::analysis::tests::common::{resolved_context, roster_of, TestMemberBuilder};
use pretty_assertions::assert_eq;
use schema::{Nature, PokemonType, StatName};

#[test]
fn trick_room_core_is_detected_with_slow_builds() {
    let roster = roster_of(vec![
        TestMemberBuilder::new("Hatterene")
            .with_moves(&["Trick Room", "Dazzling Gleam"])
            .build(),
        TestMemberBuilder::new("Torkoal")
            .with_nature(Nature::Quiet)
            .with_iv(StatName::Spe, 0)
            .with_moves(&["Heat Wave"])
            .build(),
        TestMemberBuilder::new("Iron Hands")
            .with_nature(Nature::Brave)
            .with_iv(StatName::Spe, 0)
            .with_moves(&["Drain Punch"])
            .build(),
    ]);
    let contexts: Vec<_> = roster
        .members
        .iter()
        .map(|m| resolved_context(&m.name, &[PokemonType::Normal], &[]))
        .collect();

    let findings = detect_strategies(&roster, &contexts, 8);
    let trick_room = findings.iter().find(|f| f.name == "Trick Room").unwrap();

    assert_eq!(trick_room.category, "archetype");
    assert!(trick_room.confidence >= 0.8);
    assert!(trick_room
        .details
        .iter()
        .any(|d| d.contains("built slow")));
}

#[test]
fn sun_team_reads_setter_plus_fire_types() {
    let roster = roster_of(vec![
        TestMemberBuilder::new("Torkoal")
            .with_ability("Drought")
            .with_moves(&["Heat Wave"])
            .build(),
        TestMemberBuilder::new("Charizard")
            .with_moves(&["Flamethrower", "Solar Beam"])
            .build(),
    ]);
    let contexts = vec![
        resolved_context("Torkoal", &[PokemonType::Fire], &[]),
        resolved_context("Charizard", &[PokemonType::Fire, PokemonType::Flying], &[]),
    ];

    let findings = detect_strategies(&roster, &contexts, 8);
    let sun = findings.iter().find(|f| f.name == "Sun Team").unwrap();

    assert!(sun.confidence >= 0.8);
    assert!(sun.details.iter().any(|d| d.contains("Torkoal")));
    assert!(sun.details.iter().any(|d| d.contains("2 Fire-type")));
}

#[test]
fn hyper_offense_composition_wins_over_balance() {
    let members: Vec<_> = ["A", "B", "C", "D"]
        .iter()
        .map(|n| {
            TestMemberBuilder::new(n)
                .with_ev(StatName::Atk, 252)
                .with_moves(&["Close Combat"])
                .build()
        })
        .collect();
    let roster = roster_of(members);
    let contexts: Vec<_> = roster
        .members
        .iter()
        .map(|m| resolved_context(&m.name, &[PokemonType::Fighting], &[]))
        .collect();

    let findings = detect_strategies(&roster, &contexts, 8);
    assert!(findings.iter().any(|f| f.name == "Hyper Offense"));
    assert!(!findings.iter().any(|f| f.name == "Balance"));
}

#[test]
fn findings_rank_by_confidence_then_name_and_respect_the_cap() {
    let roster = roster_of(vec![
        TestMemberBuilder::new("Tornadus")
            .with_moves(&["Tailwind", "Rage Powder"])
            .build(),
        TestMemberBuilder::new("Chien-Pao")
            .with_nature(Nature::Jolly)
            .with_ev(StatName::Spe, 252)
            .with_ev(StatName::Atk, 252)
            .with_moves(&["Swords Dance", "Sucker Punch"])
            .build(),
    ]);
    let contexts: Vec<_> = roster
        .members
        .iter()
        .map(|m| resolved_context(&m.name, &[PokemonType::Dark], &[]))
        .collect();

    let all = detect_strategies(&roster, &contexts, 8);
    assert!(all.len() >= 3);
    for pair in all.windows(2) {
        assert!(
            pair[0].confidence > pair[1].confidence
                || (pair[0].confidence == pair[1].confidence && pair[0].name <= pair[1].name),
            "findings out of order: {} before {}",
            pair[0].name,
            pair[1].name
        );
    }

    let capped = detect_strategies(&roster, &contexts, 2);
    assert_eq!(capped.len(), 2);
    assert_eq!(capped[0].name, all[0].name);
}

#[test]
fn quiet_teams_produce_no_archetype_noise() {
    let roster = roster_of(vec![TestMemberBuilder::new("Pikachu")
        .with_moves(&["Thunderbolt"])
        .build()]);
    let contexts = vec![resolved_context("Pikachu", &[PokemonType::Electric], &[])];

    let findings = detect_strategies(&roster, &contexts, 8);
    assert!(findings
        .iter()
        .all(|f| f.category == "composition" || f.confidence < 0.7));
}
