use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DistrictColor {
    Yellow,
    Blue,
    Green,
    Red,
    Purple,
}

impl DistrictColor {
    pub const ALL: [DistrictColor; 5] = [
        DistrictColor::Yellow,
        DistrictColor::Blue,
        DistrictColor::Green,
        DistrictColor::Red,
        DistrictColor::Purple,
    ];
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CharacterKind {
    Assassin,
    Thief,
    Magician,
    King,
    Bishop,
    Merchant,
    Architect,
    Warlord,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 8] = [
        CharacterKind::Assassin,
        CharacterKind::Thief,
        CharacterKind::Magician,
        CharacterKind::King,
        CharacterKind::Bishop,
        CharacterKind::Merchant,
        CharacterKind::Architect,
        CharacterKind::Warlord,
    ];

    /// Fixed turn order, 1 through 8.
    pub const fn order(self) -> u8 {
        match self {
            CharacterKind::Assassin => 1,
            CharacterKind::Thief => 2,
            CharacterKind::Magician => 3,
            CharacterKind::King => 4,
            CharacterKind::Bishop => 5,
            CharacterKind::Merchant => 6,
            CharacterKind::Architect => 7,
            CharacterKind::Warlord => 8,
        }
    }

    pub fn from_order(order: u8) -> Option<CharacterKind> {
        CharacterKind::ALL.get((order as usize).checked_sub(1)?).copied()
    }

    /// Color whose districts pay this character gold at the start of its turn.
    pub const fn income_color(self) -> Option<DistrictColor> {
        match self {
            CharacterKind::King => Some(DistrictColor::Yellow),
            CharacterKind::Bishop => Some(DistrictColor::Blue),
            CharacterKind::Merchant => Some(DistrictColor::Green),
            CharacterKind::Warlord => Some(DistrictColor::Red),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantKind {
    Human,
    Algorithm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResourceChoice {
    Gold,
    Cards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TargetPurpose {
    Kill,
    Steal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum DestroyVia {
    Warlord,
    Armory,
}
