use crate::models::Candidate;

/// The swipe deck: an ordered candidate set plus a wrapping cursor. The
/// cursor is an index into `cards`; an empty deck has cursor 0 and no
/// current candidate, which is a normal state rather than an error.
#[derive(Debug, Default)]
pub struct Deck {
    cards: Vec<Candidate>,
    cursor: usize,
}

impl Deck {
    pub fn new(cards: Vec<Candidate>) -> Self {
        Deck { cards, cursor: 0 }
    }

    /// Replaces the candidate set after a population snapshot recompute. The
    /// cursor survives when it still points inside the new set, otherwise it
    /// resets to the top.
    pub fn replace(&mut self, cards: Vec<Candidate>) {
        self.cards = cards;
        if self.cursor >= self.cards.len() {
            self.cursor = 0;
        }
    }

    pub fn current(&self) -> Option<&Candidate> {
        self.cards.get(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Pass: step to the next card, wrapping at the end.
    pub fn advance(&mut self) {
        if self.cards.is_empty() {
            self.cursor = 0;
        } else {
            self.cursor = (self.cursor + 1) % self.cards.len();
        }
    }

    /// Connect: drop the card with `id`. The cursor keeps its position when
    /// still in range (the next card slides into the same slot), else wraps
    /// back to 0.
    pub fn remove(&mut self, id: &str) {
        self.cards.retain(|c| c.user_id != id);
        if self.cursor >= self.cards.len() {
            self.cursor = 0;
        }
    }
}
