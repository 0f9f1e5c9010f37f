use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use thiserror::Error;

use crate::config::Config;
use crate::engine::catalog::{ChapterProgress, ChapterStates, chapter_for_word, compute_progress};
use crate::engine::challenge_deck::ChallengeDeck;
use crate::engine::chapter_unlock::evaluate_unlocks;
use crate::engine::response::{self, ResponseOutcome, ResponseRules};
use crate::engine::session_builder::{SessionParams, build_session};
use crate::engine::stats::Stats;
use crate::engine::word::{Word, WordError, WordState, WordStore};
use crate::session::Session;
use crate::store::schema::{
    self, CHALLENGE_DECK_KEY, CHAPTER_STATES_KEY, STATS_KEY, WORDS_KEY,
};
use crate::store::{KvStore, StoreError};

#[derive(Debug, Error)]
pub enum TrainerError {
    #[error(transparent)]
    Word(#[from] WordError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub attempted: usize,
    pub correct: u32,
    pub missed: u32,
    pub points: u32,
    pub unlocked: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Cursor moved; the new index.
    Next(usize),
    Completed(SessionSummary),
    /// No live session, or it was already completed.
    Idle,
}

/// Owns every piece of learner state plus the live session. Each mutating
/// operation persists the records it touched before returning.
pub struct Trainer {
    words: WordStore,
    chapters: ChapterStates,
    deck: ChallengeDeck,
    stats: Stats,
    session: Option<Session>,
    params: SessionParams,
    rules: ResponseRules,
    unlock_ratio: f64,
    store: Box<dyn KvStore>,
    rng: SmallRng,
}

impl Trainer {
    /// Load every record, creating defaults for anything absent, and apply
    /// the word migration.
    pub fn load(store: Box<dyn KvStore>, config: &Config) -> Result<Self, TrainerError> {
        Self::load_with_rng(store, config, SmallRng::from_entropy())
    }

    pub fn load_with_rng(
        mut store: Box<dyn KvStore>,
        config: &Config,
        rng: SmallRng,
    ) -> Result<Self, TrainerError> {
        let loaded = schema::load_words(store.as_ref())?;
        if loaded.needs_save {
            schema::save(store.as_mut(), WORDS_KEY, &loaded.words)?;
        }

        let stats = match schema::load::<Stats, _>(store.as_ref(), STATS_KEY)? {
            Some(stats) => stats,
            None => {
                let stats = Stats::default();
                schema::save(store.as_mut(), STATS_KEY, &stats)?;
                stats
            }
        };
        let deck = match schema::load::<ChallengeDeck, _>(store.as_ref(), CHALLENGE_DECK_KEY)? {
            Some(deck) => deck,
            None => {
                let deck = ChallengeDeck::default();
                schema::save(store.as_mut(), CHALLENGE_DECK_KEY, &deck)?;
                deck
            }
        };
        let chapters = match schema::load::<ChapterStates, _>(store.as_ref(), CHAPTER_STATES_KEY)? {
            Some(chapters) => chapters,
            None => {
                let chapters = ChapterStates::default();
                schema::save(store.as_mut(), CHAPTER_STATES_KEY, &chapters)?;
                chapters
            }
        };

        tracing::debug!(
            words = loaded.words.len(),
            deck = deck.len(),
            sessions = stats.total_sessions,
            "learner state loaded"
        );

        Ok(Self {
            words: WordStore::new(loaded.words),
            chapters,
            deck,
            stats,
            session: None,
            params: config.session_params(),
            rules: config.response_rules(),
            unlock_ratio: config.unlock_ratio,
            store,
            rng,
        })
    }

    fn save_words(&mut self) -> Result<(), StoreError> {
        schema::save(self.store.as_mut(), WORDS_KEY, &self.words.list())
    }

    fn save_deck(&mut self) -> Result<(), StoreError> {
        schema::save(self.store.as_mut(), CHALLENGE_DECK_KEY, &self.deck)
    }

    fn save_chapters(&mut self) -> Result<(), StoreError> {
        schema::save(self.store.as_mut(), CHAPTER_STATES_KEY, &self.chapters)
    }

    fn save_stats(&mut self) -> Result<(), StoreError> {
        schema::save(self.store.as_mut(), STATS_KEY, &self.stats)
    }

    // --- Accessors ---

    pub fn words(&self) -> &WordStore {
        &self.words
    }

    pub fn chapters(&self) -> &ChapterStates {
        &self.chapters
    }

    pub fn deck(&self) -> &ChallengeDeck {
        &self.deck
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Live record for the session's current word.
    pub fn current_word(&self) -> Option<&Word> {
        let text = self.session.as_ref()?.current_word()?;
        self.words.get(text)
    }

    pub fn chapter_progress(&self, chapter_id: u32) -> ChapterProgress {
        compute_progress(&self.words, chapter_id)
    }

    // --- Session flow ---

    /// Replace any live session with a freshly built one.
    pub fn start_session(&mut self) -> Result<&Session, TrainerError> {
        let unlocked = self.chapters.unlocked_ids();
        let session = build_session(
            &mut self.words,
            &unlocked,
            &self.deck,
            self.params,
            &mut self.rng,
        );
        self.save_words()?;
        tracing::info!(
            words = session.len(),
            challenge = session.words.iter().filter(|w| self.deck.contains(w)).count(),
            "session started"
        );
        Ok(&*self.session.insert(session))
    }

    /// Drop the live session without folding its tallies anywhere.
    pub fn end_session(&mut self) {
        if let Some(s) = self.session.take() {
            if !s.is_finalized() && !s.is_empty() {
                tracing::debug!(index = s.current_index, "abandoned session discarded");
            }
        }
    }

    /// Grade the current word. A store error means the response was applied
    /// in memory but not persisted; the word must not be graded again.
    pub fn handle_response(
        &mut self,
        correct: bool,
    ) -> Result<Option<ResponseOutcome>, TrainerError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let outcome = response::handle_response(
            session,
            &mut self.words,
            &mut self.deck,
            correct,
            &self.rules,
            Utc::now(),
        );
        let Some(outcome) = outcome else {
            return Ok(None);
        };

        self.save_words()?;
        if outcome.added_to_challenge || outcome.removed_from_challenge {
            self.save_deck()?;
        }
        tracing::debug!(
            word = %outcome.text,
            correct,
            from = outcome.previous_state.as_str(),
            to = outcome.state.as_str(),
            "response recorded"
        );
        Ok(Some(outcome))
    }

    /// Move to the next word, completing the session once it is exhausted.
    /// An empty session completes on the first call.
    pub fn advance(&mut self) -> Result<Advance, TrainerError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(Advance::Idle);
        };
        if session.is_finalized() {
            return Ok(Advance::Idle);
        }
        if !session.advance() {
            return Ok(Advance::Next(session.current_index));
        }
        self.complete_session().map(Advance::Completed)
    }

    fn complete_session(&mut self) -> Result<SessionSummary, TrainerError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(SessionSummary {
                attempted: 0,
                correct: 0,
                missed: 0,
                points: 0,
                unlocked: Vec::new(),
            });
        };
        session.finalized = true;
        self.stats.record(session);
        let mut summary = SessionSummary {
            attempted: session.len(),
            correct: session.correct_count,
            missed: session.missed_count,
            points: session.points,
            unlocked: Vec::new(),
        };
        summary.unlocked = evaluate_unlocks(&mut self.chapters, &self.words, self.unlock_ratio);

        // Both records are written even when the first write fails
        let stats_saved = self.save_stats();
        if !summary.unlocked.is_empty() {
            tracing::info!(chapters = ?summary.unlocked, "chapters unlocked");
            self.save_chapters()?;
        }
        stats_saved?;
        tracing::info!(
            correct = summary.correct,
            missed = summary.missed,
            points = summary.points,
            "session complete"
        );
        Ok(summary)
    }

    // --- Dashboard actions ---

    pub fn add_word(&mut self, raw: &str) -> Result<Word, TrainerError> {
        let chapter = chapter_for_word(raw);
        let word = self.words.add(raw, chapter)?.clone();
        self.save_words()?;
        tracing::info!(word = %word.text, chapter = ?word.chapter_id, "word added");
        Ok(word)
    }

    /// Disable an enabled word or re-enable a disabled one (as Learning).
    /// Unknown words are ignored.
    pub fn toggle_word(&mut self, text: &str) -> Result<Option<WordState>, TrainerError> {
        let Some(state) = self.words.toggle_disabled(text) else {
            return Ok(None);
        };
        self.save_words()?;
        if state == WordState::Disabled && self.deck.remove(text) {
            self.save_deck()?;
        }
        Ok(Some(state))
    }

    pub fn toggle_chapter_lock(&mut self, chapter_id: u32) -> Result<Option<bool>, TrainerError> {
        let Some(unlocked) = self.chapters.toggle(chapter_id) else {
            return Ok(None);
        };
        self.save_chapters()?;
        Ok(Some(unlocked))
    }
}
