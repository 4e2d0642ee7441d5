use tracing::{debug, warn};

use crate::game::cards::Landmark;
use crate::game::context::RoundContext;
use crate::game::players::ARCHITECT_BUILD_LIMIT;
use crate::game::rules::{self, MagicianChoice};
use crate::game::state::{DecisionError, GameEvent};
use crate::types::{CharacterKind, DestroyVia, TargetPurpose};

pub const ARCHITECT_DRAW: usize = 2;
pub const MERCHANT_BONUS: u32 = 1;

pub type AbilityFn = fn(&mut RoundContext<'_>, usize);

/// One entry per character, indexed by order - 1.
pub const ABILITIES: [AbilityFn; 8] = [
    assassin, thief, magician, king, bishop, merchant, architect, warlord,
];

pub fn resolve(ctx: &mut RoundContext<'_>, seat: usize, kind: CharacterKind) {
    debug!(seat, character = %kind, "resolving ability");
    ABILITIES[usize::from(kind.order() - 1)](ctx, seat);
}

fn choose_target(ctx: &mut RoundContext<'_>, seat: usize, purpose: TargetPurpose) -> Option<u8> {
    let valid = rules::targets(ctx.state, seat, purpose);
    let first = *valid.first()?;
    let order = ctx
        .decide_checked(
            seat,
            "character target",
            |source, state| source.choose_target(state, seat, purpose, &valid),
            |state, order| rules::validate_target(state, seat, purpose, *order),
        )
        .unwrap_or(first);
    if let Some(target) = CharacterKind::from_order(order) {
        ctx.emit(GameEvent::TargetChosen {
            seat,
            target,
            purpose,
        });
    }
    Some(order)
}

pub fn assassin(ctx: &mut RoundContext<'_>, seat: usize) {
    if let Some(order) = choose_target(ctx, seat, TargetPurpose::Kill) {
        debug!(seat, order, "assassin marks a character");
        ctx.state.killed_order = Some(order);
    }
}

pub fn thief(ctx: &mut RoundContext<'_>, seat: usize) {
    if let Some(order) = choose_target(ctx, seat, TargetPurpose::Steal) {
        debug!(seat, order, "thief marks a character");
        ctx.state.stolen_order = Some(order);
    }
}

pub fn magician(ctx: &mut RoundContext<'_>, seat: usize) {
    let choice = ctx
        .decide_checked(
            seat,
            "magician action",
            |source, state| source.choose_magician(state, seat),
            |state, choice| rules::validate_magician(state, seat, choice),
        )
        .unwrap_or(MagicianChoice::Discard(Vec::new()));

    match choice {
        MagicianChoice::SwapWith(other) => {
            let mine = std::mem::take(&mut ctx.state.players[seat].hand);
            let theirs = std::mem::replace(&mut ctx.state.players[other].hand, mine);
            ctx.state.players[seat].hand = theirs;
            debug!(seat, with = other, "magician swapped hands");
            ctx.emit(GameEvent::HandsSwapped { seat, with: other });
        }
        MagicianChoice::Discard(mut indices) => {
            if indices.is_empty() {
                return;
            }
            indices.sort_unstable_by(|a, b| b.cmp(a));
            let player = &mut ctx.state.players[seat];
            let mut discarded = indices
                .iter()
                .map(|idx| player.hand.remove(*idx))
                .collect::<Vec<_>>();
            discarded.reverse();
            let count = discarded.len();
            ctx.state.deck.add_all(discarded);
            let drawn = ctx.state.deck.draw_up_to(count);
            ctx.state.players[seat].hand.extend(drawn);
            debug!(seat, count, "magician exchanged cards with the deck");
            ctx.emit(GameEvent::CardsExchanged { seat, count });
        }
    }
}

fn collect_income(ctx: &mut RoundContext<'_>, seat: usize, kind: CharacterKind, bonus: u32) {
    let Some(color) = kind.income_color() else {
        return;
    };
    let amount = ctx.state.players[seat].income(color) + bonus;
    ctx.state.players[seat].add_gold(amount);
    debug!(seat, amount, %color, "income collected");
    if amount > 0 {
        ctx.emit(GameEvent::IncomeCollected { seat, amount });
    }
}

pub fn transfer_crown(ctx: &mut RoundContext<'_>, seat: usize) {
    let previous = ctx.state.crowned;
    if previous == seat {
        return;
    }
    let paid = ctx.state.set_crowned(seat);
    ctx.emit(GameEvent::CrownTransferred {
        from: Some(previous),
        to: seat,
    });
    for holder in paid {
        ctx.emit(GameEvent::ThroneRoomPaid { seat: holder });
    }
}

pub fn king(ctx: &mut RoundContext<'_>, seat: usize) {
    collect_income(ctx, seat, CharacterKind::King, 0);
    transfer_crown(ctx, seat);
}

pub fn bishop(ctx: &mut RoundContext<'_>, seat: usize) {
    collect_income(ctx, seat, CharacterKind::Bishop, 0);
}

pub fn merchant(ctx: &mut RoundContext<'_>, seat: usize) {
    collect_income(ctx, seat, CharacterKind::Merchant, MERCHANT_BONUS);
}

pub fn architect(ctx: &mut RoundContext<'_>, seat: usize) {
    let drawn = ctx.state.deck.draw_up_to(ARCHITECT_DRAW);
    let count = drawn.len();
    let player = &mut ctx.state.players[seat];
    player.hand.extend(drawn);
    player.build_limit = ARCHITECT_BUILD_LIMIT;
    debug!(seat, count, "architect drew cards");
    ctx.emit(GameEvent::CardsDrawn { seat, count });
}

pub fn warlord(ctx: &mut RoundContext<'_>, seat: usize) {
    collect_income(ctx, seat, CharacterKind::Warlord, 0);
    destroy_district(ctx, seat, DestroyVia::Warlord);
}

/// Offers `seat` an optional destruction. Returns true when a district was
/// removed. Contents of a destroyed Museum go to the deck; the district itself
/// goes back to its owner's hand through a Graveyard or else to the deck.
pub fn destroy_district(ctx: &mut RoundContext<'_>, seat: usize, via: DestroyVia) -> bool {
    let options = rules::destroy_options(ctx.state, seat, via);
    if options.is_empty() {
        return false;
    }
    let chosen = ctx
        .decide(
            seat,
            "destroy district",
            |source, state| source.choose_destroy(state, seat, via, &options),
            |state, choice| match choice {
                None => Ok(None),
                Some(c) => rules::validate_destroy(state, seat, via, c.target, c.district).map(Some),
            },
        )
        .and_then(|(_, option)| option);
    let Some(option) = chosen else {
        return false;
    };

    if let Err(err) = ctx.state.players[seat].spend_gold(option.cost) {
        warn!(seat, %err, "destruction abandoned");
        return false;
    }
    let mut card = ctx.state.players[option.target].city.remove(option.district);
    let stored = card.take_stored_cards();
    ctx.state.deck.add_all(stored);
    let district = card.name().to_string();
    debug!(
        seat,
        target = option.target,
        %district,
        cost = option.cost,
        ?via,
        "district destroyed"
    );
    ctx.emit(GameEvent::Destroyed {
        by: seat,
        target: option.target,
        district: district.clone(),
        via,
    });

    if card.is(Landmark::BellTower) && ctx.state.bell_tower_active {
        let end_cleared = ctx.state.deactivate_bell_tower();
        ctx.emit(GameEvent::BellTowerDeactivated { end_cleared });
    }

    let owner = option.target;
    let can_reclaim = {
        let target = &ctx.state.players[owner];
        target.has_built(Landmark::Graveyard) && target.gold >= 1
    };
    let reclaim = can_reclaim
        && ctx
            .decide_checked(
                owner,
                "graveyard",
                |source, state| source.choose_graveyard(state, owner, &card),
                |state, yes| {
                    if *yes && state.players[owner].gold < 1 {
                        Err(DecisionError::stale("graveyard needs 1 gold"))
                    } else {
                        Ok(())
                    }
                },
            )
            .unwrap_or(false);

    if reclaim && ctx.state.players[owner].spend_gold(1).is_ok() {
        ctx.state.players[owner].hand.push(card);
        debug!(seat = owner, %district, "graveyard reclaimed district");
        ctx.emit(GameEvent::Reclaimed {
            seat: owner,
            district,
        });
    } else {
        ctx.state.deck.add(card);
    }
    true
}
