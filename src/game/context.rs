use tracing::{debug, warn};

use crate::game::state::{DecisionError, GameEvent, GameState};
use crate::players::DecisionSource;
use crate::types::ParticipantKind;

pub const MAX_DECISION_ATTEMPTS: usize = 32;

/// Everything a turn may touch: the shared state and every participant's
/// decision source, indexed by seat.
pub struct RoundContext<'a> {
    pub state: &'a mut GameState,
    pub seats: &'a mut [Box<dyn DecisionSource>],
}

impl<'a> RoundContext<'a> {
    pub fn new(state: &'a mut GameState, seats: &'a mut [Box<dyn DecisionSource>]) -> Self {
        Self { state, seats }
    }

    pub fn emit(&mut self, event: GameEvent) {
        for source in self.seats.iter_mut() {
            source.observe(self.state, &event);
        }
    }

    /// Asks `seat` until `validate` accepts the answer. Each rejection is
    /// reported back to the source. Bots get `MAX_DECISION_ATTEMPTS` tries,
    /// after which `None` leaves the caller to apply its default; a human
    /// seat is asked until it answers validly.
    pub fn decide<T, V>(
        &mut self,
        seat: usize,
        what: &str,
        mut ask: impl FnMut(&mut dyn DecisionSource, &GameState) -> T,
        mut validate: impl FnMut(&GameState, &T) -> Result<V, DecisionError>,
    ) -> Option<(T, V)> {
        let unlimited = self.seats[seat].kind() == ParticipantKind::Human;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let answer = ask(self.seats[seat].as_mut(), self.state);
            match validate(self.state, &answer) {
                Ok(checked) => return Some((answer, checked)),
                Err(err) => {
                    debug!(seat, what, attempt, %err, "answer rejected");
                    self.seats[seat].rejected(&err);
                }
            }
            if !unlimited && attempt >= MAX_DECISION_ATTEMPTS {
                warn!(seat, what, "no valid answer after {MAX_DECISION_ATTEMPTS} attempts, using default");
                return None;
            }
        }
    }

    /// `decide` for answers that need no extra checking beyond `validate`'s verdict.
    pub fn decide_checked<T>(
        &mut self,
        seat: usize,
        what: &str,
        ask: impl FnMut(&mut dyn DecisionSource, &GameState) -> T,
        mut validate: impl FnMut(&GameState, &T) -> Result<(), DecisionError>,
    ) -> Option<T> {
        self.decide(seat, what, ask, |state, answer| validate(state, answer))
            .map(|(answer, ())| answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::bundled_deck;
    use crate::game::state::GameConfig;
    use crate::players::ScriptedPlayer;

    fn stubborn(participant: ParticipantKind, bad_answers: usize) -> ScriptedPlayer {
        let mut player = ScriptedPlayer::new();
        player.participant = participant;
        player.builds.extend(std::iter::repeat_n(Some(0), bad_answers));
        player.builds.push_back(None);
        player
    }

    fn ask_build(ctx: &mut RoundContext<'_>) -> Option<Option<usize>> {
        ctx.decide_checked(
            0,
            "build",
            |source, state| source.choose_build(state, 0),
            |_, answer| match answer {
                Some(_) => Err(DecisionError::input("not now")),
                None => Ok(()),
            },
        )
    }

    #[test]
    fn bots_fall_back_after_the_attempt_budget() {
        let mut state = GameState::new(GameConfig::default(), bundled_deck().unwrap()).unwrap();
        let player = stubborn(ParticipantKind::Algorithm, MAX_DECISION_ATTEMPTS + 8);
        let rejections = player.rejection_log();
        let mut seats: Vec<Box<dyn DecisionSource>> = vec![Box::new(player)];
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        assert_eq!(ask_build(&mut ctx), None);
        assert_eq!(rejections.borrow().len(), MAX_DECISION_ATTEMPTS);
    }

    #[test]
    fn humans_are_asked_until_they_answer_validly() {
        let mut state = GameState::new(GameConfig::default(), bundled_deck().unwrap()).unwrap();
        let player = stubborn(ParticipantKind::Human, MAX_DECISION_ATTEMPTS + 8);
        let rejections = player.rejection_log();
        let mut seats: Vec<Box<dyn DecisionSource>> = vec![Box::new(player)];
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        assert_eq!(ask_build(&mut ctx), Some(None));
        assert_eq!(rejections.borrow().len(), MAX_DECISION_ATTEMPTS + 8);
    }
}
