use serde::{Deserialize, Serialize};

use crate::game::cards::{DistrictCard, Landmark};
use crate::types::{CharacterKind, DistrictColor, ParticipantKind};

pub const DEFAULT_BUILD_LIMIT: u8 = 1;
pub const ARCHITECT_BUILD_LIMIT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GoldError {
    #[error("needs {needed} gold but holds {available}")]
    Insufficient { needed: u32, available: u32 },
}

fn default_build_limit() -> u8 {
    DEFAULT_BUILD_LIMIT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: u8,
    pub name: String,
    pub kind: ParticipantKind,
    pub gold: u32,
    pub hand: Vec<DistrictCard>,
    pub city: Vec<DistrictCard>,
    pub character: Option<CharacterKind>,
    #[serde(skip, default = "default_build_limit")]
    pub build_limit: u8,
    #[serde(skip)]
    pub builds_this_turn: u8,
    #[serde(skip)]
    pub score: Option<u32>,
}

impl PlayerState {
    pub fn new(id: u8, name: impl Into<String>, kind: ParticipantKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            gold: 0,
            hand: Vec::new(),
            city: Vec::new(),
            character: None,
            build_limit: DEFAULT_BUILD_LIMIT,
            builds_this_turn: 0,
            score: None,
        }
    }

    pub fn has_built(&self, landmark: Landmark) -> bool {
        self.city.iter().any(|c| c.is(landmark))
    }

    pub fn built_index(&self, landmark: Landmark) -> Option<usize> {
        self.city.iter().position(|c| c.is(landmark))
    }

    pub fn built_mut(&mut self, landmark: Landmark) -> Option<&mut DistrictCard> {
        self.city.iter_mut().find(|c| c.is(landmark))
    }

    pub fn copies_in_city(&self, card: &DistrictCard) -> usize {
        self.city.iter().filter(|c| c.same_name(card)).count()
    }

    /// A second copy needs a Quarry that was not itself built this round; a
    /// third copy is never allowed.
    pub fn duplicate_allowed(&self, card: &DistrictCard, round: u32) -> bool {
        match self.copies_in_city(card) {
            0 => true,
            1 => self
                .city
                .iter()
                .find(|c| c.is(Landmark::Quarry))
                .is_some_and(|quarry| quarry.last_built_round() != Some(round)),
            _ => false,
        }
    }

    /// Factory takes 1 off every other purple district once it stands.
    pub fn build_cost(&self, card: &DistrictCard) -> u32 {
        if card.color() == DistrictColor::Purple
            && !card.is(Landmark::Factory)
            && self.has_built(Landmark::Factory)
        {
            card.cost().saturating_sub(1)
        } else {
            card.cost()
        }
    }

    pub fn income(&self, color: DistrictColor) -> u32 {
        self.city.iter().filter(|c| c.matches_color(color)).count() as u32
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold += amount;
    }

    pub fn spend_gold(&mut self, amount: u32) -> Result<(), GoldError> {
        if amount > self.gold {
            return Err(GoldError::Insufficient {
                needed: amount,
                available: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    pub fn take_all_gold(&mut self) -> u32 {
        std::mem::take(&mut self.gold)
    }

    pub fn builds_remaining(&self) -> u8 {
        self.build_limit.saturating_sub(self.builds_this_turn)
    }

    pub fn reset_turn(&mut self) {
        self.build_limit = DEFAULT_BUILD_LIMIT;
        self.builds_this_turn = 0;
    }

    pub fn most_expensive_in_hand(&self) -> Option<u32> {
        self.hand.iter().map(DistrictCard::cost).max()
    }

    pub fn has_purple_in_hand(&self) -> bool {
        self.hand.iter().any(|c| c.color() == DistrictColor::Purple)
    }

    pub fn stored_card_count(&self) -> usize {
        self.city.iter().map(|c| c.stored_cards().len()).sum()
    }

    /// Physical district cards held: hand, city, and anything stored inside the city.
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.city.iter().map(DistrictCard::card_count).sum::<usize>()
    }
}
