use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::game::cards::{CharacterCard, DistrictCard};
use crate::game::rules::{DestroyOption, MagicianChoice};
use crate::game::state::{DecisionError, GameEvent, GameState};
use crate::players::{DecisionSource, DestroyChoice, HeuristicPlayer, RoundGate};
use crate::types::{CharacterKind, DestroyVia, ParticipantKind, ResourceChoice, TargetPurpose};

/// Replays queued answers, one queue per decision. Once a queue runs dry the
/// heuristic bot answers instead.
pub struct ScriptedPlayer {
    pub characters: VecDeque<CharacterKind>,
    pub targets: VecDeque<u8>,
    pub magician: VecDeque<MagicianChoice>,
    pub destroys: VecDeque<Option<DestroyChoice>>,
    pub graveyard: VecDeque<bool>,
    pub laboratory: VecDeque<Option<usize>>,
    pub smithy: VecDeque<bool>,
    pub museum: VecDeque<Option<usize>>,
    pub resources: VecDeque<ResourceChoice>,
    pub drawn: VecDeque<usize>,
    pub builds: VecDeque<Option<usize>>,
    pub lighthouse: VecDeque<usize>,
    pub bell_tower: VecDeque<bool>,
    pub gates: VecDeque<RoundGate>,
    /// Reported through `kind`; `Algorithm` unless a test stands in for a person.
    pub participant: ParticipantKind,
    fallback: HeuristicPlayer,
    rejections: Rc<RefCell<Vec<DecisionError>>>,
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl ScriptedPlayer {
    pub fn new() -> Self {
        Self {
            characters: VecDeque::new(),
            targets: VecDeque::new(),
            magician: VecDeque::new(),
            destroys: VecDeque::new(),
            graveyard: VecDeque::new(),
            laboratory: VecDeque::new(),
            smithy: VecDeque::new(),
            museum: VecDeque::new(),
            resources: VecDeque::new(),
            drawn: VecDeque::new(),
            builds: VecDeque::new(),
            lighthouse: VecDeque::new(),
            bell_tower: VecDeque::new(),
            gates: VecDeque::new(),
            participant: ParticipantKind::Algorithm,
            fallback: HeuristicPlayer::new(0),
            rejections: Rc::new(RefCell::new(Vec::new())),
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Shared view of every rejected answer, readable after the player is boxed.
    pub fn rejection_log(&self) -> Rc<RefCell<Vec<DecisionError>>> {
        Rc::clone(&self.rejections)
    }

    pub fn event_log(&self) -> Rc<RefCell<Vec<GameEvent>>> {
        Rc::clone(&self.events)
    }
}

impl Default for ScriptedPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionSource for ScriptedPlayer {
    fn kind(&self) -> ParticipantKind {
        self.participant
    }

    fn choose_character(
        &mut self,
        state: &GameState,
        seat: usize,
        available: &[CharacterCard],
    ) -> CharacterKind {
        match self.characters.pop_front() {
            Some(kind) => kind,
            None => self.fallback.choose_character(state, seat, available),
        }
    }

    fn choose_target(
        &mut self,
        state: &GameState,
        seat: usize,
        purpose: TargetPurpose,
        valid: &[u8],
    ) -> u8 {
        match self.targets.pop_front() {
            Some(order) => order,
            None => self.fallback.choose_target(state, seat, purpose, valid),
        }
    }

    fn choose_magician(&mut self, state: &GameState, seat: usize) -> MagicianChoice {
        match self.magician.pop_front() {
            Some(choice) => choice,
            None => self.fallback.choose_magician(state, seat),
        }
    }

    fn choose_destroy(
        &mut self,
        state: &GameState,
        seat: usize,
        via: DestroyVia,
        options: &[DestroyOption],
    ) -> Option<DestroyChoice> {
        match self.destroys.pop_front() {
            Some(choice) => choice,
            None => self.fallback.choose_destroy(state, seat, via, options),
        }
    }

    fn choose_graveyard(&mut self, state: &GameState, seat: usize, card: &DistrictCard) -> bool {
        match self.graveyard.pop_front() {
            Some(answer) => answer,
            None => self.fallback.choose_graveyard(state, seat, card),
        }
    }

    fn choose_laboratory(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        match self.laboratory.pop_front() {
            Some(answer) => answer,
            None => self.fallback.choose_laboratory(state, seat),
        }
    }

    fn choose_smithy(&mut self, state: &GameState, seat: usize) -> bool {
        match self.smithy.pop_front() {
            Some(answer) => answer,
            None => self.fallback.choose_smithy(state, seat),
        }
    }

    fn choose_museum(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        match self.museum.pop_front() {
            Some(answer) => answer,
            None => self.fallback.choose_museum(state, seat),
        }
    }

    fn choose_resource(&mut self, state: &GameState, seat: usize) -> ResourceChoice {
        match self.resources.pop_front() {
            Some(choice) => choice,
            None => self.fallback.choose_resource(state, seat),
        }
    }

    fn choose_drawn_card(
        &mut self,
        state: &GameState,
        seat: usize,
        drawn: &[DistrictCard],
    ) -> usize {
        match self.drawn.pop_front() {
            Some(idx) => idx,
            None => self.fallback.choose_drawn_card(state, seat, drawn),
        }
    }

    fn choose_build(&mut self, state: &GameState, seat: usize) -> Option<usize> {
        match self.builds.pop_front() {
            Some(answer) => answer,
            None => self.fallback.choose_build(state, seat),
        }
    }

    fn choose_lighthouse(&mut self, state: &GameState, seat: usize) -> usize {
        match self.lighthouse.pop_front() {
            Some(idx) => idx,
            None => self.fallback.choose_lighthouse(state, seat),
        }
    }

    fn choose_bell_tower(&mut self, state: &GameState, seat: usize) -> bool {
        match self.bell_tower.pop_front() {
            Some(answer) => answer,
            None => self.fallback.choose_bell_tower(state, seat),
        }
    }

    fn round_gate(&mut self, _state: &GameState, _seat: usize) -> RoundGate {
        self.gates.pop_front().unwrap_or(RoundGate::Continue)
    }

    fn observe(&mut self, state: &GameState, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
        self.fallback.observe(state, event);
    }

    fn rejected(&mut self, error: &DecisionError) {
        self.rejections.borrow_mut().push(error.clone());
    }
}
