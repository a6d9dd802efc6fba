//! solved.ac difficulty tiers.
//!
//! Ranks 1..=30 cover six named groups with five sub-ranks each, ordered from
//! V (lowest) to I (highest) inside a group.

use strum::{Display, EnumString};

const SUB_RANKS: [&str; 5] = ["V", "IV", "III", "II", "I"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum TierGroup {
    #[strum(serialize = "브론즈")]
    Bronze,
    #[strum(serialize = "실버")]
    Silver,
    #[strum(serialize = "골드")]
    Gold,
    #[strum(serialize = "플래티넘")]
    Platinum,
    #[strum(serialize = "다이아몬드")]
    Diamond,
    #[strum(serialize = "루비")]
    Ruby,
}

const GROUPS: [TierGroup; 6] = [
    TierGroup::Bronze,
    TierGroup::Silver,
    TierGroup::Gold,
    TierGroup::Platinum,
    TierGroup::Diamond,
    TierGroup::Ruby,
];

/// Display name for a rank, e.g. `6` -> `실버 V`. Unrated or out of range ranks have no name.
pub fn tier_name(tier: Option<u8>) -> Option<String> {
    let rank = tier?;
    if !(1..=30).contains(&rank) {
        return None;
    }
    let idx = usize::from(rank - 1);
    let group = GROUPS[idx / SUB_RANKS.len()];
    Some(format!("{} {}", group, SUB_RANKS[idx % SUB_RANKS.len()]))
}
