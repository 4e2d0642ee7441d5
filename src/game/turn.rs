use smallvec::SmallVec;
use tracing::{debug, info};

use crate::game::abilities;
use crate::game::cards::{DistrictCard, Landmark, best_card_index};
use crate::game::context::RoundContext;
use crate::game::rules;
use crate::game::state::{DecisionError, GameEvent};
use crate::types::{DestroyVia, ResourceChoice};

pub const GOLD_TAKE: u32 = 2;
pub const CARDS_DRAWN: usize = 2;
pub const OBSERVATORY_DRAWN: usize = 3;
pub const SMITHY_PRICE: u32 = 2;
pub const SMITHY_DRAW: usize = 3;
pub const PARK_DRAW: usize = 2;

type Drawn = SmallVec<[DistrictCard; 3]>;

/// Ability, purple passives, resources, builds, end-of-turn passives, reset.
pub fn take_turn(ctx: &mut RoundContext<'_>, seat: usize) {
    if let Some(kind) = ctx.state.character_of(seat) {
        abilities::resolve(ctx, seat, kind);
    }
    laboratory(ctx, seat);
    smithy(ctx, seat);
    armory(ctx, seat);
    museum(ctx, seat);
    collect_resources(ctx, seat);
    build_phase(ctx, seat);
    poor_house(ctx, seat);
    park(ctx, seat);
    ctx.state.players[seat].reset_turn();
}

/// The resource step alone, granted to an assassinated Hospital owner.
pub fn take_limited_turn(ctx: &mut RoundContext<'_>, seat: usize) {
    collect_resources(ctx, seat);
    ctx.state.players[seat].reset_turn();
}

fn laboratory(ctx: &mut RoundContext<'_>, seat: usize) {
    let player = &ctx.state.players[seat];
    if !player.has_built(Landmark::Laboratory) || player.hand.is_empty() {
        return;
    }
    let choice = ctx
        .decide_checked(
            seat,
            "laboratory",
            |source, state| source.choose_laboratory(state, seat),
            |state, choice| match choice {
                Some(idx) => rules::validate_hand_index(state, seat, *idx),
                None => Ok(()),
            },
        )
        .flatten();
    let Some(index) = choice else {
        return;
    };
    let player = &mut ctx.state.players[seat];
    let card = player.hand.remove(index);
    player.add_gold(1);
    debug!(seat, district = card.name(), "laboratory discard");
    ctx.state.deck.add(card);
    ctx.emit(GameEvent::LandmarkUsed {
        seat,
        landmark: Landmark::Laboratory,
    });
}

fn smithy(ctx: &mut RoundContext<'_>, seat: usize) {
    let player = &ctx.state.players[seat];
    if !player.has_built(Landmark::Smithy) || player.gold < SMITHY_PRICE {
        return;
    }
    let accepted = ctx
        .decide_checked(
            seat,
            "smithy",
            |source, state| source.choose_smithy(state, seat),
            |_, _| Ok(()),
        )
        .unwrap_or(false);
    if !accepted || ctx.state.players[seat].spend_gold(SMITHY_PRICE).is_err() {
        return;
    }
    let drawn = ctx.state.deck.draw_up_to(SMITHY_DRAW);
    debug!(seat, count = drawn.len(), "smithy draw");
    ctx.state.players[seat].hand.extend(drawn);
    ctx.emit(GameEvent::LandmarkUsed {
        seat,
        landmark: Landmark::Smithy,
    });
}

fn armory(ctx: &mut RoundContext<'_>, seat: usize) {
    if !ctx.state.players[seat].has_built(Landmark::Armory) {
        return;
    }
    if !abilities::destroy_district(ctx, seat, DestroyVia::Armory) {
        return;
    }
    let player = &mut ctx.state.players[seat];
    if let Some(idx) = player.built_index(Landmark::Armory) {
        let armory = player.city.remove(idx);
        ctx.state.deck.add(armory);
    }
    ctx.emit(GameEvent::LandmarkUsed {
        seat,
        landmark: Landmark::Armory,
    });
}

fn museum(ctx: &mut RoundContext<'_>, seat: usize) {
    let player = &ctx.state.players[seat];
    if !player.has_built(Landmark::Museum) || player.hand.is_empty() {
        return;
    }
    let choice = ctx
        .decide_checked(
            seat,
            "museum",
            |source, state| source.choose_museum(state, seat),
            |state, choice| match choice {
                Some(idx) => rules::validate_hand_index(state, seat, *idx),
                None => Ok(()),
            },
        )
        .flatten();
    let Some(index) = choice else {
        return;
    };
    let player = &mut ctx.state.players[seat];
    let card = player.hand.remove(index);
    if let Some(museum) = player.built_mut(Landmark::Museum) {
        museum.store_card(card);
    }
    debug!(seat, "museum stored a card");
    ctx.emit(GameEvent::LandmarkUsed {
        seat,
        landmark: Landmark::Museum,
    });
}

fn take_gold(ctx: &mut RoundContext<'_>, seat: usize) {
    ctx.state.players[seat].add_gold(GOLD_TAKE);
    ctx.emit(GameEvent::ResourceTaken {
        seat,
        choice: ResourceChoice::Gold,
    });
}

/// Two gold, or cards from the deck. An empty deck pays gold instead and a
/// single remaining card is taken without choosing.
pub fn collect_resources(ctx: &mut RoundContext<'_>, seat: usize) {
    let choice = ctx
        .decide_checked(
            seat,
            "resource",
            |source, state| source.choose_resource(state, seat),
            |_, _| Ok(()),
        )
        .unwrap_or(ResourceChoice::Gold);
    debug!(seat, %choice, "resource choice");

    if choice == ResourceChoice::Gold || ctx.state.deck.is_empty() {
        take_gold(ctx, seat);
        return;
    }

    if ctx.state.deck.len() == 1 {
        if let Some(card) = ctx.state.deck.draw() {
            ctx.state.players[seat].hand.push(card);
        }
    } else {
        let player = &ctx.state.players[seat];
        let keep_all = player.has_built(Landmark::Library);
        let count = if player.has_built(Landmark::Observatory) {
            OBSERVATORY_DRAWN
        } else {
            CARDS_DRAWN
        };
        let mut drawn = Drawn::from_vec(ctx.state.deck.draw_up_to(count));
        if keep_all {
            ctx.state.players[seat].hand.extend(drawn);
        } else {
            let fallback = best_card_index(&drawn).unwrap_or(0);
            let keep = ctx
                .decide_checked(
                    seat,
                    "drawn card",
                    |source, state| source.choose_drawn_card(state, seat, &drawn),
                    |_, idx| {
                        if *idx < drawn.len() {
                            Ok(())
                        } else {
                            Err(DecisionError::input(format!(
                                "choose between 1 and {}",
                                drawn.len()
                            )))
                        }
                    },
                )
                .unwrap_or(fallback);
            let kept = drawn.remove(keep);
            ctx.state.players[seat].hand.push(kept);
            ctx.state.deck.add_all(drawn);
        }
    }
    ctx.emit(GameEvent::ResourceTaken {
        seat,
        choice: ResourceChoice::Cards,
    });
}

fn build_phase(ctx: &mut RoundContext<'_>, seat: usize) {
    while ctx.state.players[seat].builds_remaining() > 0 {
        let chosen = ctx
            .decide(
                seat,
                "build",
                |source, state| source.choose_build(state, seat),
                |state, choice| match choice {
                    Some(idx) => rules::validate_build(state, seat, *idx).map(Some),
                    None => Ok(None),
                },
            )
            .and_then(|(index, cost)| Some((index?, cost?)));
        let Some((index, cost)) = chosen else {
            break;
        };
        build_district(ctx, seat, index, cost);
    }
}

/// Builds the hand card at `index` for `cost`, then runs on-build effects and
/// the completion check.
pub fn build_district(ctx: &mut RoundContext<'_>, seat: usize, index: usize, cost: u32) {
    let round = ctx.state.round;
    let player = &mut ctx.state.players[seat];
    if player.spend_gold(cost).is_err() {
        return;
    }
    let mut card = player.hand.remove(index);
    card.set_built_round(round);
    player.builds_this_turn += 1;
    let landmark = card.landmark();
    let district = card.name().to_string();
    player.city.push(card);
    debug!(seat, %district, cost, "district built");
    ctx.emit(GameEvent::Built {
        seat,
        district,
        cost,
    });

    match landmark {
        Some(Landmark::Lighthouse) => lighthouse(ctx, seat),
        Some(Landmark::BellTower) => bell_tower(ctx, seat),
        _ => {}
    }

    if ctx.state.check_completion(seat) {
        let first = ctx.state.first_to_finish == Some(seat);
        info!(seat, round, "city complete, game ends after this round");
        ctx.emit(GameEvent::CityCompleted { seat, first });
    }
}

fn lighthouse(ctx: &mut RoundContext<'_>, seat: usize) {
    if ctx.state.deck.is_empty() {
        return;
    }
    let fallback = best_card_index(&ctx.state.deck.snapshot()).unwrap_or(0);
    let index = ctx
        .decide_checked(
            seat,
            "lighthouse",
            |source, state| source.choose_lighthouse(state, seat),
            |state, idx| {
                if *idx < state.deck.len() {
                    Ok(())
                } else {
                    Err(DecisionError::input(format!(
                        "choose a deck position between 1 and {}",
                        state.deck.len()
                    )))
                }
            },
        )
        .unwrap_or(fallback);
    if let Some(card) = ctx.state.deck.take_at(index) {
        debug!(seat, district = card.name(), "lighthouse search");
        ctx.state.players[seat].hand.push(card);
    }
    let state = &mut *ctx.state;
    state.deck.shuffle(&mut state.rng);
    ctx.emit(GameEvent::LandmarkUsed {
        seat,
        landmark: Landmark::Lighthouse,
    });
}

fn bell_tower(ctx: &mut RoundContext<'_>, seat: usize) {
    let activate = ctx
        .decide_checked(
            seat,
            "bell tower",
            |source, state| source.choose_bell_tower(state, seat),
            |_, _| Ok(()),
        )
        .unwrap_or(false);
    if activate {
        ctx.state.activate_bell_tower();
        info!(seat, "bell tower activated, cities complete at 7");
        ctx.emit(GameEvent::BellTowerActivated { seat });
    }
}

fn poor_house(ctx: &mut RoundContext<'_>, seat: usize) {
    let player = &mut ctx.state.players[seat];
    if player.has_built(Landmark::PoorHouse) && player.gold == 0 {
        player.add_gold(1);
        ctx.emit(GameEvent::LandmarkUsed {
            seat,
            landmark: Landmark::PoorHouse,
        });
    }
}

fn park(ctx: &mut RoundContext<'_>, seat: usize) {
    if !ctx.state.players[seat].has_built(Landmark::Park) || !ctx.state.players[seat].hand.is_empty()
    {
        return;
    }
    let drawn = ctx.state.deck.draw_up_to(PARK_DRAW);
    ctx.state.players[seat].hand.extend(drawn);
    ctx.emit(GameEvent::LandmarkUsed {
        seat,
        landmark: Landmark::Park,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::deck::Deck;
    use crate::game::state::{GameConfig, GameState};
    use crate::players::{DecisionSource, ScriptedPlayer};
    use crate::types::{CharacterKind, DistrictColor};

    fn card(name: &str, cost: u32, color: DistrictColor) -> DistrictCard {
        DistrictCard::new(name, cost, color, "")
    }

    fn names(cards: &[DistrictCard]) -> Vec<String> {
        cards.iter().map(|c| c.name().to_string()).collect()
    }

    fn setup(deck: Vec<DistrictCard>) -> (GameState, Vec<ScriptedPlayer>) {
        let filler = Deck::from_cards((0..16).map(|_| card("Hut", 1, DistrictColor::Green)));
        let mut state = GameState::new(GameConfig::default(), filler).unwrap();
        for player in &mut state.players {
            player.hand.clear();
            player.gold = 0;
        }
        state.deck = Deck::from_cards(deck);
        (state, (0..4).map(|_| ScriptedPlayer::new()).collect())
    }

    fn boxed(scripts: Vec<ScriptedPlayer>) -> Vec<Box<dyn DecisionSource>> {
        scripts
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn DecisionSource>)
            .collect()
    }

    #[test]
    fn cards_keep_one_and_return_the_rest_in_order() {
        let (mut state, mut scripts) = setup(vec![
            card("Temple", 1, DistrictColor::Blue),
            card("Palace", 5, DistrictColor::Yellow),
            card("Tavern", 1, DistrictColor::Green),
        ]);
        scripts[0].resources.push_back(ResourceChoice::Cards);
        scripts[0].drawn.push_back(1);
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        collect_resources(&mut ctx, 0);
        assert_eq!(names(&state.players[0].hand), vec!["Palace"]);
        assert_eq!(names(&state.deck.snapshot()), vec!["Tavern", "Temple"]);
    }

    #[test]
    fn observatory_and_library_keep_three() {
        let (mut state, mut scripts) = setup(vec![
            card("Temple", 1, DistrictColor::Blue),
            card("Palace", 5, DistrictColor::Yellow),
            card("Tavern", 1, DistrictColor::Green),
            card("Market", 2, DistrictColor::Green),
        ]);
        state.players[0].city = vec![
            card("Observatory", 5, DistrictColor::Purple),
            card("Library", 6, DistrictColor::Purple),
        ];
        scripts[0].resources.push_back(ResourceChoice::Cards);
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        collect_resources(&mut ctx, 0);
        assert_eq!(state.players[0].hand.len(), 3);
        assert_eq!(names(&state.deck.snapshot()), vec!["Market"]);
    }

    #[test]
    fn single_card_deck_is_taken_and_empty_deck_pays_gold() {
        let (mut state, mut scripts) = setup(vec![card("Temple", 1, DistrictColor::Blue)]);
        scripts[0]
            .resources
            .extend([ResourceChoice::Cards, ResourceChoice::Cards]);
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        collect_resources(&mut ctx, 0);
        collect_resources(&mut ctx, 0);
        assert_eq!(names(&state.players[0].hand), vec!["Temple"]);
        assert_eq!(state.players[0].gold, GOLD_TAKE);
    }

    #[test]
    fn architect_turn_builds_up_to_three() {
        let (mut state, mut scripts) = setup(vec![
            card("Tavern", 1, DistrictColor::Green),
            card("Temple", 1, DistrictColor::Blue),
        ]);
        state.players[0].character = Some(CharacterKind::Architect);
        state.players[0].gold = 10;
        state.players[0].hand = vec![
            card("Manor", 3, DistrictColor::Yellow),
            card("Market", 2, DistrictColor::Green),
        ];
        scripts[0].resources.push_back(ResourceChoice::Gold);
        scripts[0]
            .builds
            .extend([Some(0), Some(0), Some(0), Some(0)]);
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        take_turn(&mut ctx, 0);
        let player = &state.players[0];
        assert_eq!(player.city.len(), 3);
        assert_eq!(player.hand.len(), 1);
        assert_eq!(player.gold, 10 + 2 - 3 - 2 - 1);
        assert_eq!(player.build_limit, 1);
        assert_eq!(player.builds_this_turn, 0);
        assert!(player.city.iter().all(|c| c.last_built_round() == Some(1)));
    }

    #[test]
    fn lighthouse_takes_chosen_card_from_deck() {
        let (mut state, mut scripts) = setup(vec![
            card("Temple", 1, DistrictColor::Blue),
            card("Palace", 5, DistrictColor::Yellow),
            card("Tavern", 1, DistrictColor::Green),
        ]);
        state.players[0].gold = 3;
        state.players[0].hand = vec![card("Lighthouse", 3, DistrictColor::Purple)];
        scripts[0].lighthouse.push_back(2);
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        build_district(&mut ctx, 0, 0, 3);
        assert_eq!(names(&state.players[0].hand), vec!["Tavern"]);
        assert_eq!(state.deck.len(), 2);
    }

    #[test]
    fn bell_tower_lowers_threshold_and_completes_at_seven() {
        let (mut state, mut scripts) = setup(Vec::new());
        state.players[0].gold = 5;
        state.players[0].city = (0..6)
            .map(|i| card(&format!("Shop {i}"), 1, DistrictColor::Green))
            .collect();
        state.players[0].hand = vec![card("Bell Tower", 5, DistrictColor::Purple)];
        scripts[0].bell_tower.push_back(true);
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        build_district(&mut ctx, 0, 0, 5);
        assert!(state.bell_tower_active);
        assert_eq!(state.end_threshold, 7);
        assert!(state.game_should_end);
        assert_eq!(state.first_to_finish, Some(0));
    }

    #[test]
    fn armory_is_sacrificed_after_use() {
        let (mut state, mut scripts) = setup(Vec::new());
        state.players[0].city = vec![card("Armory", 3, DistrictColor::Purple)];
        state.players[1].city = vec![card("Palace", 5, DistrictColor::Yellow)];
        scripts[0]
            .destroys
            .push_back(Some(crate::players::DestroyChoice {
                target: 1,
                district: 0,
            }));
        scripts[0].resources.push_back(ResourceChoice::Gold);
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        take_turn(&mut ctx, 0);
        assert!(state.players[0].city.is_empty());
        assert!(state.players[1].city.is_empty());
        assert_eq!(names(&state.deck.snapshot()), vec!["Palace", "Armory"]);
    }

    #[test]
    fn laboratory_smithy_and_museum_passives() {
        let (mut state, mut scripts) = setup(
            (0..5)
                .map(|i| card(&format!("Hut {i}"), 1, DistrictColor::Green))
                .collect(),
        );
        state.players[0].city = vec![
            card("Laboratory", 5, DistrictColor::Purple),
            card("Smithy", 5, DistrictColor::Purple),
            card("Museum", 4, DistrictColor::Purple),
        ];
        state.players[0].gold = 2;
        state.players[0].hand = vec![card("Temple", 1, DistrictColor::Blue)];
        scripts[0].laboratory.push_back(Some(0));
        scripts[0].smithy.push_back(true);
        scripts[0].museum.push_back(Some(0));
        scripts[0].resources.push_back(ResourceChoice::Gold);
        scripts[0].builds.push_back(None);
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        take_turn(&mut ctx, 0);
        let player = &state.players[0];
        assert_eq!(player.gold, 2 + 1 - 2 + 2);
        assert_eq!(player.hand.len(), 2);
        assert_eq!(player.stored_card_count(), 1);
        assert_eq!(state.deck.len(), 5 - 3 + 1);
    }

    #[test]
    fn poor_house_and_park_fire_at_end_of_turn() {
        let (mut state, mut scripts) = setup(vec![
            card("Temple", 1, DistrictColor::Blue),
            card("Tavern", 1, DistrictColor::Green),
            card("Market", 2, DistrictColor::Green),
        ]);
        state.players[0].city = vec![
            card("Poor House", 4, DistrictColor::Purple),
            card("Park", 6, DistrictColor::Purple),
        ];
        state.players[0].hand = vec![card("Manor", 3, DistrictColor::Yellow)];
        state.players[0].gold = 1;
        scripts[0].resources.push_back(ResourceChoice::Gold);
        scripts[0].builds.push_back(Some(0));
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        take_turn(&mut ctx, 0);
        let player = &state.players[0];
        assert_eq!(player.gold, 1);
        assert_eq!(names(&player.hand), vec!["Temple", "Tavern"]);
    }

    #[test]
    fn limited_turn_only_collects() {
        let (mut state, mut scripts) = setup(Vec::new());
        state.players[0].character = Some(CharacterKind::Merchant);
        state.players[0].city = vec![card("Market", 2, DistrictColor::Green)];
        state.players[0].hand = vec![card("Tavern", 1, DistrictColor::Green)];
        scripts[0].resources.push_back(ResourceChoice::Gold);
        scripts[0].builds.push_back(Some(0));
        let mut seats = boxed(scripts);
        let mut ctx = RoundContext::new(&mut state, &mut seats);
        take_limited_turn(&mut ctx, 0);
        assert_eq!(state.players[0].gold, 2);
        assert_eq!(state.players[0].city.len(), 1);
    }
}
