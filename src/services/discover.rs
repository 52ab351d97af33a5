use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::models::{Candidate, ProfileType};
use crate::services::deck::Deck;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::matching::{compute_candidates, CandidateOutcome};
use crate::services::population_feed::PopulationFeed;
use crate::services::store::{connection_id_set, ConnectionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeIntent {
    Pass,
    Connect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckStatus {
    /// A current candidate is available.
    Ready,
    /// Scanned the population and found nobody new.
    Empty,
    /// Visitor without interests: blocked on the interests gate, the
    /// population was never scanned.
    NeedsInterests,
    /// No profile document yet for this user.
    NoProfile,
    /// Transport trouble; the client should show a loading state and retry.
    Loading,
}

#[derive(Debug, Serialize)]
pub struct DiscoverView {
    pub status: DeckStatus,
    pub candidate: Option<Candidate>,
    pub remaining: usize,
}

impl DiscoverView {
    fn settled(status: DeckStatus) -> Self {
        DiscoverView {
            status,
            candidate: None,
            remaining: 0,
        }
    }

    pub fn loading() -> Self {
        DiscoverView::settled(DeckStatus::Loading)
    }
}

#[derive(Debug, Serialize)]
pub struct SwipeReceipt {
    pub outcome: &'static str,
    pub candidate: Candidate,
}

struct DeckEntry {
    deck: Deck,
    snapshot_seq: u64,
}

/// Per-view orchestrator: owns the per-user deck state and wires profile,
/// population snapshot, matching engine and connection store together.
///
/// Candidate set and cursor are only ever touched inside one lock hold
/// (read-modify-write as a single step), so a population snapshot arriving
/// concurrently can never observe a torn deck.
pub struct DiscoverService {
    store: Arc<dyn ConnectionStore>,
    feed: Arc<PopulationFeed>,
    decks: Mutex<HashMap<String, DeckEntry>>,
}

impl DiscoverService {
    pub fn new(store: Arc<dyn ConnectionStore>, feed: Arc<PopulationFeed>) -> Arc<Self> {
        Arc::new(DiscoverService {
            store,
            feed,
            decks: Mutex::new(HashMap::new()),
        })
    }

    /// Builds the discover tab view, recomputing the deck if the population
    /// snapshot moved since the last time this user looked.
    pub async fn build_view(&self, user_id: &str) -> ServiceResult<DiscoverView> {
        let Some(profile) = self.store.get_profile(user_id).await? else {
            return Ok(DiscoverView::settled(DeckStatus::NoProfile));
        };

        // Interests gate before any deck work; mirrors the engine's fast
        // path so the client can route to the interests form.
        if profile.profile_type == ProfileType::Visitor && profile.interests.is_empty() {
            return Ok(DiscoverView::settled(DeckStatus::NeedsInterests));
        }

        let connections = self.store.get_connections(user_id).await?;
        let snapshot = self.feed.latest(profile.profile_type.opposite());

        let mut decks = self.decks.lock().await;
        let entry = decks.entry(user_id.to_string()).or_insert_with(|| DeckEntry {
            deck: Deck::default(),
            snapshot_seq: 0,
        });

        let stale = entry.snapshot_seq != snapshot.seq || entry.deck.is_empty();
        if stale {
            let outcome = compute_candidates(
                &profile,
                &snapshot.records,
                &connection_id_set(&connections),
            );
            match outcome {
                CandidateOutcome::MissingInterests => {
                    return Ok(DiscoverView::settled(DeckStatus::NeedsInterests));
                }
                CandidateOutcome::Candidates(cards) => {
                    entry.deck.replace(cards);
                    entry.snapshot_seq = snapshot.seq;
                }
            }
        }

        Ok(match entry.deck.current() {
            Some(card) => DiscoverView {
                status: DeckStatus::Ready,
                candidate: Some(card.clone()),
                remaining: entry.deck.len(),
            },
            None => DiscoverView::settled(DeckStatus::Empty),
        })
    }

    /// Applies a pass/connect decision to the user's current candidate.
    ///
    /// The connect path awaits the store write before touching the deck: the
    /// matches refresh a client does next is sequenced strictly after the
    /// write's outcome, not after an optimistic update.
    pub async fn record_swipe(
        &self,
        user_id: &str,
        intent: SwipeIntent,
    ) -> ServiceResult<SwipeReceipt> {
        let current = {
            let mut decks = self.decks.lock().await;
            let entry = decks
                .get_mut(user_id)
                .ok_or(ServiceError::Validation("no candidate to swipe on"))?;
            let card = entry
                .deck
                .current()
                .cloned()
                .ok_or(ServiceError::Validation("no candidate to swipe on"))?;

            if intent == SwipeIntent::Pass {
                entry.deck.advance();
            }
            card
        };

        if intent == SwipeIntent::Pass {
            return Ok(SwipeReceipt {
                outcome: "passed",
                candidate: current,
            });
        }

        // Store write outside the deck lock; the deck mutation afterwards is
        // again a single atomic step.
        self.store.add_connection(user_id, &current.user_id).await?;
        info!("{} connected with {}", user_id, current.user_id);

        {
            let mut decks = self.decks.lock().await;
            if let Some(entry) = decks.get_mut(user_id) {
                entry.deck.remove(&current.user_id);
            }
        }
        // Let the next snapshot fold the new connection into everyone's deck.
        self.feed.nudge();

        Ok(SwipeReceipt {
            outcome: "connected",
            candidate: current.connected(),
        })
    }

    /// Drops the cached deck so the next view recomputes, e.g. after the
    /// user edits their interests.
    pub async fn invalidate(&self, user_id: &str) {
        self.decks.lock().await.remove(user_id);
    }
}
