//! Speed tiers and speed-control detection.
//!
//! Speeds use the level-50 stat formula the VGC formats play at:
//! `((2*base + iv + ev/4) * 50/100 + 5) * nature`, then item multipliers.

use crate::analysis::context::MemberContext;
use schema::{Member, Roster, StatName};
use serde::Serialize;

pub const TRICK_ROOM_MOVES: &[&str] = &["trick room"];
pub const TAILWIND_MOVES: &[&str] = &["tailwind"];
pub const SPEED_REDUCTION_MOVES: &[&str] = &[
    "icy wind",
    "electroweb",
    "thunder wave",
    "bleakwind storm",
];

/// Fallback priority tables for moves the dex could not resolve.
pub const PLUS_PRIORITY_MOVES: &[&str] = &[
    "fake out",
    "extreme speed",
    "sucker punch",
    "aqua jet",
    "ice shard",
    "bullet punch",
    "mach punch",
    "vacuum wave",
    "quick attack",
    "shadow sneak",
    "accelerock",
    "first impression",
    "grassy glide",
];
pub const MINUS_PRIORITY_MOVES: &[&str] = &["trick room", "whirlwind", "roar", "dragon tail", "circle throw"];

/// A member's speed in the conditions that matter for turn order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedTier {
    pub member: String,
    pub base_speed: Option<u8>,
    /// Level-50 speed after EVs, IVs, nature and item.
    pub effective_speed: Option<u16>,
    pub tailwind_speed: Option<u16>,
    /// Booster Energy speed, when the item and a speed nature line up.
    pub booster_speed: Option<u16>,
    pub priority_moves: Vec<String>,
    pub negative_priority_moves: Vec<String>,
}

/// Which speed-control tools the team carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeedControlAvailability {
    pub tailwind: bool,
    pub trick_room: bool,
    pub priority: bool,
    pub speed_reduction: bool,
}

impl SpeedControlAvailability {
    pub fn any(&self) -> bool {
        self.tailwind || self.trick_room || self.priority || self.speed_reduction
    }

    pub fn describe(&self) -> Vec<&'static str> {
        let mut tools = Vec::new();
        if self.tailwind {
            tools.push("Tailwind");
        }
        if self.trick_room {
            tools.push("Trick Room");
        }
        if self.speed_reduction {
            tools.push("speed reduction");
        }
        if self.priority {
            tools.push("priority moves");
        }
        tools
    }
}

pub fn stat_at_level_50(base: u8, ev: u8, iv: u8, nature_multiplier: f32) -> u16 {
    let raw = (2 * base as u16 + iv as u16 + ev as u16 / 4) / 2 + 5;
    (raw as f32 * nature_multiplier) as u16
}

fn item_speed_multiplier(item: Option<&str>) -> f32 {
    match item.map(str::to_ascii_lowercase).as_deref() {
        Some("choice scarf") => 1.5,
        Some("iron ball") | Some("macho brace") => 0.5,
        _ => 1.0,
    }
}

/// Compute the speed tier for one member. Unknown base speed leaves the
/// computed fields empty; the priority lists still come from the moveset.
pub fn speed_tier(member: &Member, ctx: &MemberContext) -> SpeedTier {
    let base_speed = ctx.base_speed();
    let nature_multiplier = member
        .nature
        .map(|n| n.speed_multiplier())
        .unwrap_or(1.0);

    let effective_speed = base_speed.map(|base| {
        let raw = stat_at_level_50(
            base,
            member.ev(StatName::Spe),
            member.iv(StatName::Spe),
            nature_multiplier,
        );
        (raw as f32 * item_speed_multiplier(member.item.as_deref())) as u16
    });

    let booster_speed = effective_speed.and_then(|speed| {
        let boosted_item = member
            .item
            .as_deref()
            .map(|i| i.eq_ignore_ascii_case("booster energy"))
            .unwrap_or(false);
        let boosted_nature = member.nature.map(|n| n.boosts_speed()).unwrap_or(false);
        (boosted_item && boosted_nature).then(|| (speed as f32 * 1.5) as u16)
    });

    let mut priority_moves = Vec::new();
    let mut negative_priority_moves = Vec::new();
    for resolved in &ctx.moves {
        let lower = resolved.name.to_ascii_lowercase();
        match resolved.profile.as_ref() {
            Some(profile) if profile.priority > 0 => priority_moves.push(resolved.name.clone()),
            Some(profile) if profile.priority < 0 => {
                negative_priority_moves.push(resolved.name.clone())
            }
            Some(_) => {}
            None if PLUS_PRIORITY_MOVES.contains(&lower.as_str()) => {
                priority_moves.push(resolved.name.clone())
            }
            None if MINUS_PRIORITY_MOVES.contains(&lower.as_str()) => {
                negative_priority_moves.push(resolved.name.clone())
            }
            None => {}
        }
    }

    SpeedTier {
        member: member.name.clone(),
        base_speed,
        effective_speed,
        tailwind_speed: effective_speed.map(|s| s * 2),
        booster_speed,
        priority_moves,
        negative_priority_moves,
    }
}

pub fn member_has_move_in(member: &Member, table: &[&str]) -> bool {
    member
        .moves
        .iter()
        .any(|m| table.contains(&m.to_ascii_lowercase().as_str()))
}

/// Team-level speed control inventory, from movesets and resolved tiers.
pub fn speed_control_availability(
    roster: &Roster,
    tiers: &[SpeedTier],
) -> SpeedControlAvailability {
    SpeedControlAvailability {
        tailwind: roster
            .members
            .iter()
            .any(|m| member_has_move_in(m, TAILWIND_MOVES)),
        trick_room: roster
            .members
            .iter()
            .any(|m| member_has_move_in(m, TRICK_ROOM_MOVES)),
        priority: tiers.iter().any(|t| !t.priority_moves.is_empty()),
        speed_reduction: roster
            .members
            .iter()
            .any(|m| member_has_move_in(m, SPEED_REDUCTION_MOVES)),
    }
}
