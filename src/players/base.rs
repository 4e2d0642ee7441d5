use std::path::PathBuf;

use crate::game::cards::{CharacterCard, DistrictCard};
use crate::game::rules::{DestroyOption, MagicianChoice};
use crate::game::state::{DecisionError, GameEvent, GameState};
use crate::types::{CharacterKind, DestroyVia, ParticipantKind, ResourceChoice, TargetPurpose};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyChoice {
    pub target: usize,
    pub district: usize,
}

impl From<DestroyOption> for DestroyChoice {
    fn from(option: DestroyOption) -> Self {
        Self {
            target: option.target,
            district: option.district,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundGate {
    Continue,
    Save(Option<PathBuf>),
}

/// Answers every choice a participant faces. The engine validates each answer
/// before applying it and asks again after calling `rejected`.
pub trait DecisionSource {
    fn kind(&self) -> ParticipantKind {
        ParticipantKind::Algorithm
    }

    fn choose_character(
        &mut self,
        state: &GameState,
        seat: usize,
        available: &[CharacterCard],
    ) -> CharacterKind;

    fn choose_target(
        &mut self,
        state: &GameState,
        seat: usize,
        purpose: TargetPurpose,
        valid: &[u8],
    ) -> u8;

    fn choose_magician(&mut self, state: &GameState, seat: usize) -> MagicianChoice;

    /// `None` skips the optional destruction.
    fn choose_destroy(
        &mut self,
        state: &GameState,
        seat: usize,
        via: DestroyVia,
        options: &[DestroyOption],
    ) -> Option<DestroyChoice>;

    /// Asked of the owner of a destroyed district while they hold a Graveyard.
    fn choose_graveyard(&mut self, state: &GameState, seat: usize, card: &DistrictCard) -> bool;

    fn choose_laboratory(&mut self, state: &GameState, seat: usize) -> Option<usize>;

    fn choose_smithy(&mut self, state: &GameState, seat: usize) -> bool;

    fn choose_museum(&mut self, state: &GameState, seat: usize) -> Option<usize>;

    fn choose_resource(&mut self, state: &GameState, seat: usize) -> ResourceChoice;

    fn choose_drawn_card(&mut self, state: &GameState, seat: usize, drawn: &[DistrictCard])
    -> usize;

    /// Hand position to build, or `None` to end the build step.
    fn choose_build(&mut self, state: &GameState, seat: usize) -> Option<usize>;

    /// Deck position to take with the Lighthouse.
    fn choose_lighthouse(&mut self, state: &GameState, seat: usize) -> usize;

    fn choose_bell_tower(&mut self, state: &GameState, seat: usize) -> bool;

    fn round_gate(&mut self, _state: &GameState, _seat: usize) -> RoundGate {
        RoundGate::Continue
    }

    fn observe(&mut self, _state: &GameState, _event: &GameEvent) {}

    fn rejected(&mut self, _error: &DecisionError) {}
}
