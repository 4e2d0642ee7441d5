use std::collections::VecDeque;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Draws come off the front, returns go on the back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck<T> {
    cards: VecDeque<T>,
}

impl<T> Default for Deck<T> {
    fn default() -> Self {
        Self {
            cards: VecDeque::new(),
        }
    }
}

impl<T> Deck<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: impl IntoIterator<Item = T>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn draw(&mut self) -> Option<T> {
        self.cards.pop_front()
    }

    /// Draws up to `count` cards; fewer when the deck runs out.
    pub fn draw_up_to(&mut self, count: usize) -> Vec<T> {
        let take = count.min(self.cards.len());
        self.cards.drain(..take).collect()
    }

    pub fn add(&mut self, card: T) {
        self.cards.push_back(card);
    }

    pub fn add_all(&mut self, cards: impl IntoIterator<Item = T>) {
        self.cards.extend(cards);
    }

    /// Removes the card at `index` (0 = front) without disturbing the others.
    pub fn take_at(&mut self, index: usize) -> Option<T> {
        self.cards.remove(index)
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        self.cards.make_contiguous().shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.cards.iter()
    }
}

impl<T: Clone> Deck<T> {
    /// Copy of the current contents, front first.
    pub fn snapshot(&self) -> Vec<T> {
        self.cards.iter().cloned().collect()
    }
}
