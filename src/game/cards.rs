use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::types::{CharacterKind, DistrictColor};

pub const DRAGON_GATE_SCORE: u32 = 8;

/// Purple districts with a named ability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Landmark {
    Armory,
    #[strum(serialize = "Bell Tower")]
    BellTower,
    #[strum(serialize = "Dragon Gate")]
    DragonGate,
    Factory,
    Graveyard,
    #[strum(serialize = "Great Wall")]
    GreatWall,
    #[strum(serialize = "Haunted City")]
    HauntedCity,
    Hospital,
    #[strum(serialize = "Imperial Treasury")]
    ImperialTreasury,
    Keep,
    Laboratory,
    Library,
    Lighthouse,
    #[strum(serialize = "Map Room")]
    MapRoom,
    Museum,
    Observatory,
    Park,
    #[strum(serialize = "Poor House")]
    PoorHouse,
    Quarry,
    #[strum(serialize = "School of Magic")]
    SchoolOfMagic,
    Smithy,
    #[strum(serialize = "Throne Room")]
    ThroneRoom,
    University,
    #[strum(serialize = "Wishing Well")]
    WishingWell,
}

impl Landmark {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictCard {
    name: String,
    cost: u32,
    color: DistrictColor,
    #[serde(default)]
    ability: String,
    #[serde(default)]
    last_built_round: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    stored_cards: Vec<DistrictCard>,
}

impl DistrictCard {
    pub fn new(
        name: impl Into<String>,
        cost: u32,
        color: DistrictColor,
        ability: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cost,
            color,
            ability: ability.into(),
            last_built_round: None,
            stored_cards: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn color(&self) -> DistrictColor {
        self.color
    }

    pub fn ability(&self) -> &str {
        &self.ability
    }

    pub fn last_built_round(&self) -> Option<u32> {
        self.last_built_round
    }

    pub fn set_built_round(&mut self, round: u32) {
        self.last_built_round = Some(round);
    }

    pub fn stored_cards(&self) -> &[DistrictCard] {
        &self.stored_cards
    }

    pub fn store_card(&mut self, card: DistrictCard) {
        self.stored_cards.push(card);
    }

    pub fn take_stored_cards(&mut self) -> Vec<DistrictCard> {
        std::mem::take(&mut self.stored_cards)
    }

    /// Only purple districts carry a named ability.
    pub fn landmark(&self) -> Option<Landmark> {
        if self.color != DistrictColor::Purple {
            return None;
        }
        self.name.parse().ok()
    }

    pub fn is(&self, landmark: Landmark) -> bool {
        self.landmark() == Some(landmark)
    }

    pub fn same_name(&self, other: &DistrictCard) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }

    pub fn is_wildcard(&self) -> bool {
        self.is(Landmark::SchoolOfMagic)
    }

    pub fn matches_color(&self, color: DistrictColor) -> bool {
        self.color == color || self.is_wildcard()
    }

    pub fn score_value(&self) -> u32 {
        match self.landmark() {
            Some(Landmark::DragonGate | Landmark::University) => DRAGON_GATE_SCORE,
            _ => self.cost,
        }
    }

    /// Higher cost wins; on equal cost a purple card beats a non-purple one.
    pub fn is_greater(&self, other: &DistrictCard) -> bool {
        self.cost > other.cost
            || (self.cost == other.cost
                && self.color == DistrictColor::Purple
                && other.color != DistrictColor::Purple)
    }

    /// Total number of physical cards this entry accounts for, stored cards included.
    pub fn card_count(&self) -> usize {
        1 + self.stored_cards.iter().map(DistrictCard::card_count).sum::<usize>()
    }
}

impl fmt::Display for DistrictCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}{}]", self.name, self.color, self.cost)
    }
}

/// Index of the greatest card, keeping the earliest on ties.
pub fn best_card_index(cards: &[DistrictCard]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, card) in cards.iter().enumerate() {
        match best {
            Some(current) if !card.is_greater(&cards[current]) => {}
            _ => best = Some(idx),
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCard {
    pub kind: CharacterKind,
    pub name: String,
    pub order: u8,
    pub ability: String,
}

impl CharacterCard {
    pub fn new(kind: CharacterKind) -> Self {
        Self {
            kind,
            name: kind.to_string(),
            order: kind.order(),
            ability: ability_text(kind).to_string(),
        }
    }

    /// Fresh 8-card character set in turn order.
    pub fn roster() -> Vec<CharacterCard> {
        CharacterKind::ALL.iter().map(|kind| CharacterCard::new(*kind)).collect()
    }
}

impl fmt::Display for CharacterCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.order, self.name)
    }
}

pub fn ability_text(kind: CharacterKind) -> &'static str {
    match kind {
        CharacterKind::Assassin => "Kill a character",
        CharacterKind::Thief => "Steal gold from a character",
        CharacterKind::Magician => "Swap or discard and redraw cards",
        CharacterKind::King => "Gain gold from yellow districts and take crown",
        CharacterKind::Bishop => "Gain gold from blue districts and protect city",
        CharacterKind::Merchant => "Gain gold from green districts and +1 gold",
        CharacterKind::Architect => "Draw 2 cards and build up to 3 districts",
        CharacterKind::Warlord => "Gain gold from red districts and destroy a district",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purple(name: &str, cost: u32) -> DistrictCard {
        DistrictCard::new(name, cost, DistrictColor::Purple, "")
    }

    #[test]
    fn landmarks_require_purple() {
        assert_eq!(purple("Bell Tower", 5).landmark(), Some(Landmark::BellTower));
        assert_eq!(purple("school of magic", 6).landmark(), Some(Landmark::SchoolOfMagic));
        let decoy = DistrictCard::new("Wishing Well", 0, DistrictColor::Red, "");
        assert_eq!(decoy.landmark(), None);
        assert_eq!(purple("Tavern", 1).landmark(), None);
    }

    #[test]
    fn dragon_gate_and_university_score_eight() {
        assert_eq!(purple("Dragon Gate", 6).score_value(), 8);
        assert_eq!(purple("University", 6).score_value(), 8);
        assert_eq!(purple("Library", 6).score_value(), 6);
        let red_gate = DistrictCard::new("Dragon Gate", 2, DistrictColor::Red, "");
        assert_eq!(red_gate.score_value(), 2);
    }

    #[test]
    fn greater_prefers_cost_then_purple() {
        let tavern = DistrictCard::new("Tavern", 1, DistrictColor::Green, "");
        let temple = DistrictCard::new("Temple", 1, DistrictColor::Blue, "");
        let castle = DistrictCard::new("Castle", 4, DistrictColor::Yellow, "");
        let keep = purple("Keep", 3);
        let monastery = DistrictCard::new("Monastery", 3, DistrictColor::Blue, "");

        assert!(castle.is_greater(&tavern));
        assert!(!tavern.is_greater(&castle));
        assert!(!tavern.is_greater(&temple));
        assert!(keep.is_greater(&monastery));
        assert!(!monastery.is_greater(&keep));
    }

    #[test]
    fn best_card_keeps_first_on_tie() {
        let cards = vec![
            DistrictCard::new("Tavern", 1, DistrictColor::Green, ""),
            DistrictCard::new("Temple", 1, DistrictColor::Blue, ""),
        ];
        assert_eq!(best_card_index(&cards), Some(0));

        let cards = vec![
            DistrictCard::new("Monastery", 3, DistrictColor::Blue, ""),
            purple("Keep", 3),
            DistrictCard::new("Tavern", 1, DistrictColor::Green, ""),
        ];
        assert_eq!(best_card_index(&cards), Some(1));
        assert_eq!(best_card_index(&[]), None);
    }

    #[test]
    fn school_of_magic_matches_every_color() {
        let school = purple("School of Magic", 6);
        for color in DistrictColor::ALL {
            assert!(school.matches_color(color));
        }
        let manor = DistrictCard::new("Manor", 3, DistrictColor::Yellow, "");
        assert!(manor.matches_color(DistrictColor::Yellow));
        assert!(!manor.matches_color(DistrictColor::Red));
    }

    #[test]
    fn stored_cards_are_counted_and_taken() {
        let mut museum = purple("Museum", 4);
        museum.store_card(DistrictCard::new("Tavern", 1, DistrictColor::Green, ""));
        museum.store_card(DistrictCard::new("Temple", 1, DistrictColor::Blue, ""));
        assert_eq!(museum.card_count(), 3);
        let taken = museum.take_stored_cards();
        assert_eq!(taken.len(), 2);
        assert!(museum.stored_cards().is_empty());
    }

    #[test]
    fn roster_is_fresh_and_ordered() {
        let roster = CharacterCard::roster();
        assert_eq!(roster.len(), 8);
        assert_eq!(roster[3].name, "King");
        assert_eq!(roster[3].order, 4);
        assert_eq!(roster[7].kind, CharacterKind::Warlord);
    }

    #[test]
    fn display_shows_color_and_cost() {
        let card = DistrictCard::new("Watchtower", 1, DistrictColor::Red, "");
        assert_eq!(card.to_string(), "Watchtower [red1]");
    }
}
